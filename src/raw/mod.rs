mod arena;
mod handle;
mod node;
mod raw_two_three_map;

pub(crate) use handle::Handle;
pub(crate) use node::Node;
pub(crate) use raw_two_three_map::RawTwoThreeMap;

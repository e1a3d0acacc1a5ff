//! Ordered collections backed by a 2-3 tree.
//!
//! This crate provides [`TwoThreeMap`] and [`TwoThreeSet`], ordered collections with an
//! API shaped like the standard library's `BTreeMap` and `BTreeSet`. Every node of a
//! 2-3 tree holds one or two entries and every leaf sits at the same depth, so lookup,
//! insertion and removal are all O(log n).
//!
//! # Example
//!
//! ```
//! use two_three_tree::TwoThreeMap;
//!
//! let mut scores = TwoThreeMap::new();
//! assert_eq!(scores.get(&"Alice"), None);
//!
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // In-order traversal
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//!
//! assert_eq!(scores.remove(&"Bob"), Some(85));
//! assert!(!scores.contains_key(&"Bob"));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - Method names mirror `std::collections::BTreeMap`/`BTreeSet`
//! - **No unsafe code** - Nodes live in an index-addressed arena
//! - **`tracing`** (optional feature) - Logs splits, merges and root changes
//!
//! # Implementation
//!
//! Internal nodes hold full entries, so a lookup can finish above the leaves. An insert
//! that overflows a node splits it and promotes the middle entry, possibly all the way
//! to a new root. A removal that empties a node borrows an entry from a sibling or
//! merges with it, possibly collapsing the root. The tree height only ever changes at
//! the root.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;
mod tracing_helpers;

pub mod two_three_map;
pub mod two_three_set;

pub use two_three_map::TwoThreeMap;
pub use two_three_set::TwoThreeSet;

use alloc::vec::Vec;
use core::borrow::Borrow;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Children, InternalNode, Keys, MAX_KEYS, Node, SearchResult, Values};
use crate::tracing_helpers::{debug_log, trace_log};

/// The core 2-3 tree backing `TwoThreeMap` and `TwoThreeSet`.
#[derive(Clone)]
pub(crate) struct RawTwoThreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node. An empty tree is an empty root leaf.
    root: Handle,
    /// Number of edges between the root and every leaf.
    height: usize,
    /// Total number of key-value pairs in the tree.
    len: usize,
}

/// Path element for tracking traversal during mutations.
struct PathElement {
    /// Handle to the internal node at this level.
    node: Handle,
    /// Index of the child we descended into.
    child_index: usize,
}

/// Stack of internal nodes from the root down to the node being mutated.
type Path = SmallVec<[PathElement; 16]>;

/// Where a search for a key ended.
struct Location {
    /// Internal nodes descended through, root first.
    path: Path,
    /// The node holding the key, or the leaf the key would be inserted into.
    node: Handle,
    result: SearchResult,
}

/// One node being consumed by `drain_to_vec`.
struct DrainFrame<K, V> {
    entries: core::iter::Zip<<Keys<K> as IntoIterator>::IntoIter, <Values<V> as IntoIterator>::IntoIter>,
    children: <Children as IntoIterator>::IntoIter,
}

impl<K, V> RawTwoThreeMap<K, V> {
    /// Creates a new tree consisting of an empty root leaf.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new tree with node storage for `capacity` pairs.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        // Every node holds at least one pair, so `capacity` nodes always suffice.
        let mut nodes = Arena::with_capacity(capacity.max(1));
        let root = nodes.alloc(Node::new_leaf());
        Self {
            nodes,
            root,
            height: 0,
            len: 0,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of edges from the root to any leaf.
    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of nodes the tree can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every pair and reinstalls an empty root leaf.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::new_leaf());
        self.height = 0;
        self.len = 0;
    }

    /// Returns the root handle.
    pub(crate) fn root(&self) -> Handle {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Moves every pair out in key order and leaves the tree empty.
    ///
    /// Nodes are consumed directly, so this is O(n) with no rebalancing.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut result = Vec::with_capacity(self.len);
        let mut stack: SmallVec<[DrainFrame<K, V>; 16]> = SmallVec::new();
        let mut descend = Some(self.root);

        loop {
            while let Some(handle) = descend.take() {
                let (keys, values, children): (Keys<K>, Values<V>, Children) = self.nodes.take(handle).into_parts();
                let mut children = children.into_iter();
                descend = children.next();
                stack.push(DrainFrame {
                    entries: keys.into_iter().zip(values),
                    children,
                });
            }

            let Some(frame) = stack.last_mut() else {
                break;
            };
            if let Some(entry) = frame.entries.next() {
                result.push(entry);
                descend = frame.children.next();
            } else {
                stack.pop();
            }
        }

        debug_assert_eq!(result.len(), self.len, "drained pair count differs from len");
        self.clear();
        result
    }

    /// Walks to the leftmost leaf below `current`, recording the path.
    fn descend_leftmost(&self, mut current: Handle, path: &mut Path) -> Handle {
        while let Node::Internal(internal) = self.nodes.get(current) {
            path.push(PathElement {
                node: current,
                child_index: 0,
            });
            current = internal.child(0);
        }
        current
    }

    /// Walks to the rightmost leaf below `current`, recording the path.
    fn descend_rightmost(&self, mut current: Handle, path: &mut Path) -> Handle {
        while let Node::Internal(internal) = self.nodes.get(current) {
            let child_index = internal.child_count() - 1;
            path.push(PathElement {
                node: current,
                child_index,
            });
            current = internal.child(child_index);
        }
        current
    }

    /// Returns the first key-value pair in the tree.
    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get(current) {
            current = internal.child(0);
        }
        let leaf = self.nodes.get(current);
        if leaf.key_count() == 0 {
            return None;
        }
        Some((leaf.key(0), leaf.value(0)))
    }

    /// Returns the last key-value pair in the tree.
    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get(current) {
            current = internal.child(internal.child_count() - 1);
        }
        let leaf = self.nodes.get(current);
        let last = leaf.key_count().checked_sub(1)?;
        Some((leaf.key(last), leaf.value(last)))
    }

    /// Removes and returns the first key-value pair.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        if self.len == 0 {
            return None;
        }

        let mut path = Path::new();
        let leaf = self.descend_leftmost(self.root, &mut path);
        let removed = self.nodes.get_mut(leaf).as_leaf_mut().remove(0);
        self.len -= 1;
        self.rebalance(leaf, path);
        Some(removed)
    }

    /// Removes and returns the last key-value pair.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        if self.len == 0 {
            return None;
        }

        let mut path = Path::new();
        let leaf = self.descend_rightmost(self.root, &mut path);
        let (key, value, _) = self.nodes.get_mut(leaf).pop_back();
        self.len -= 1;
        self.rebalance(leaf, path);
        Some((key, value))
    }

    /// Restores the key-count invariant after `node` lost a pair.
    ///
    /// Walks up `path` while nodes are left empty: borrow from the left sibling, then
    /// the right sibling, otherwise merge (left sibling first), which takes a pair away
    /// from the parent and may empty it in turn.
    fn rebalance(&mut self, mut node: Handle, mut path: Path) {
        while self.nodes.get(node).is_underfull() {
            let Some(PathElement {
                node: parent,
                child_index,
            }) = path.pop()
            else {
                self.collapse_root();
                return;
            };

            let siblings = self.nodes.get(parent).as_internal();
            let left = child_index.checked_sub(1).map(|index| siblings.child(index));
            let right = (child_index + 1 < siblings.child_count()).then(|| siblings.child(child_index + 1));

            if let Some(left) = left
                && self.nodes.get(left).can_lend()
            {
                self.rotate_from_left(parent, child_index);
                return;
            }
            if let Some(right) = right
                && self.nodes.get(right).can_lend()
            {
                self.rotate_from_right(parent, child_index);
                return;
            }

            let separator = if left.is_some() { child_index - 1 } else { child_index };
            self.merge_children(parent, separator);
            node = parent;
        }
    }

    /// Moves the left sibling's last pair up into the parent and the parent's
    /// separator down into the child at `index`.
    fn rotate_from_left(&mut self, parent: Handle, index: usize) {
        let siblings = self.nodes.get(parent).as_internal();
        let (left, target) = (siblings.child(index - 1), siblings.child(index));

        let (key, value, child) = self.nodes.get_mut(left).pop_back();
        let (separator_key, separator_value) = self.nodes.get_mut(parent).replace_entry(index - 1, key, value);
        self.nodes.get_mut(target).push_front(separator_key, separator_value, child);
        trace_log!(child_index = index, "borrowed from left sibling");
    }

    /// Moves the right sibling's first pair up into the parent and the parent's
    /// separator down into the child at `index`.
    fn rotate_from_right(&mut self, parent: Handle, index: usize) {
        let siblings = self.nodes.get(parent).as_internal();
        let (target, right) = (siblings.child(index), siblings.child(index + 1));

        let (key, value, child) = self.nodes.get_mut(right).pop_front();
        let (separator_key, separator_value) = self.nodes.get_mut(parent).replace_entry(index, key, value);
        self.nodes.get_mut(target).push_back(separator_key, separator_value, child);
        trace_log!(child_index = index, "borrowed from right sibling");
    }

    /// Merges the children on either side of `separator` together with the separator
    /// pair itself, freeing the right child's slot.
    fn merge_children(&mut self, parent: Handle, separator: usize) {
        let parent_node = self.nodes.get_mut(parent).as_internal_mut();
        let (key, value, right) = parent_node.remove_child(separator);
        let left = parent_node.child(separator);

        let right = self.nodes.take(right);
        self.nodes.get_mut(left).merge_with_right(key, value, right);
        trace_log!(separator = separator, "merged siblings");
    }

    /// Replaces an emptied internal root by its only child.
    fn collapse_root(&mut self) {
        if let Node::Internal(root) = self.nodes.get(self.root) {
            debug_assert_eq!(root.child_count(), 1, "emptied root must have exactly one child");
            let child = root.child(0);
            self.nodes.free(self.root);
            self.root = child;
            self.height -= 1;
            debug_log!(height = self.height, len = self.len, "root collapsed, tree shrank");
        }
    }
}

impl<K: Ord, V> RawTwoThreeMap<K, V> {
    /// Descends from the root and records the internal nodes passed on the way.
    ///
    /// Stops at the node holding `key`, or at the leaf where `key` belongs.
    fn locate<Q>(&self, key: &Q) -> Location
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut path = Path::new();
        let mut current = self.root;

        loop {
            let node = self.nodes.get(current);
            match (node, node.search(key)) {
                (Node::Internal(internal), SearchResult::NotFound(child_index)) => {
                    path.push(PathElement {
                        node: current,
                        child_index,
                    });
                    current = internal.child(child_index);
                }
                (_, result) => {
                    return Location {
                        path,
                        node: current,
                        result,
                    };
                }
            }
        }
    }

    /// Searches for a key and returns the node handle and index if found.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<(Handle, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;

        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(idx) => return Some((current, idx)),
                SearchResult::NotFound(idx) => match node {
                    Node::Internal(internal) => current = internal.child(idx),
                    Node::Leaf(_) => return None,
                },
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, idx) = self.search(key)?;
        Some(self.nodes.get(handle).value(idx))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, idx) = self.search(key)?;
        Some(self.nodes.get_mut(handle).value_mut(idx))
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, idx) = self.search(key)?;
        let node = self.nodes.get(handle);
        Some((node.key(idx), node.value(idx)))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present; the stored key is kept.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Location { path, node, result } = self.locate(&key);

        match result {
            SearchResult::Found(idx) => Some(core::mem::replace(self.nodes.get_mut(node).value_mut(idx), value)),
            SearchResult::NotFound(idx) => {
                let leaf = self.nodes.get_mut(node).as_leaf_mut();
                leaf.insert(idx, key, value);
                self.len += 1;

                if leaf.key_count() > MAX_KEYS {
                    self.split_and_propagate(node, path);
                }
                None
            }
        }
    }

    /// Splits an overflowing leaf and carries the promoted pair up the path,
    /// splitting every parent that overflows in turn.
    fn split_and_propagate(&mut self, leaf: Handle, mut path: Path) {
        let (mut key, mut value, right) = self.nodes.get_mut(leaf).as_leaf_mut().split();
        let mut new_child = self.nodes.alloc(Node::Leaf(right));
        trace_log!(depth = path.len(), "split leaf");

        while let Some(elem) = path.pop() {
            let parent = self.nodes.get_mut(elem.node).as_internal_mut();
            parent.insert_child(elem.child_index, key, value, new_child);
            if parent.key_count() <= MAX_KEYS {
                return;
            }

            let (median_key, median_value, right) = parent.split();
            key = median_key;
            value = median_value;
            new_child = self.nodes.alloc(Node::Internal(right));
            trace_log!(depth = path.len(), "split internal node");
        }

        // The split reached the root.
        let old_root = self.root;
        let new_root = InternalNode::new_root(old_root, key, value, new_child);
        self.root = self.nodes.alloc(Node::Internal(new_root));
        self.height += 1;
        debug_log!(height = self.height, len = self.len, "root split, tree grew");
    }

    /// Removes a key from the tree and returns the value.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Location { mut path, node, result } = self.locate(key);
        let SearchResult::Found(idx) = result else {
            return None;
        };

        let (leaf, removed) = match self.nodes.get(node) {
            Node::Leaf(_) => (node, self.nodes.get_mut(node).as_leaf_mut().remove(idx)),
            Node::Internal(internal) => {
                // Pull the in-order predecessor up into the slot so the removal
                // happens at a leaf.
                let left_child = internal.child(idx);
                path.push(PathElement {
                    node,
                    child_index: idx,
                });
                let leaf = self.descend_rightmost(left_child, &mut path);
                let (predecessor_key, predecessor_value, _) = self.nodes.get_mut(leaf).pop_back();
                let removed = self.nodes.get_mut(node).replace_entry(idx, predecessor_key, predecessor_value);
                (leaf, removed)
            }
        };

        self.len -= 1;
        self.rebalance(leaf, path);
        Some(removed)
    }

    /// Keeps only the pairs for which `f` returns true.
    ///
    /// The tree is drained and rebuilt from the survivors. If `f` panics, the
    /// pair it was looking at and every pair after it go back into the tree.
    pub(crate) fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let pending = self.drain_to_vec().into_iter();
        let mut guard = RetainGuard { tree: self, pending, current: None };

        for pair in guard.pending.by_ref() {
            let (key, value) = guard.current.insert(pair);
            let keep = f(key, value);
            if let Some((key, value)) = guard.current.take().filter(|_| keep) {
                guard.tree.insert(key, value);
            }
        }
    }
}

/// Holds the pairs `retain` has not finished with.
///
/// Dropping the guard reinserts them, so a panicking predicate loses nothing it
/// had not already rejected.
struct RetainGuard<'a, K: Ord, V> {
    tree: &'a mut RawTwoThreeMap<K, V>,
    pending: alloc::vec::IntoIter<(K, V)>,
    /// The pair handed to the predicate, until it returns.
    current: Option<(K, V)>,
}

impl<K: Ord, V> Drop for RetainGuard<'_, K, V> {
    fn drop(&mut self) {
        if let Some((key, value)) = self.current.take() {
            self.tree.insert(key, value);
        }
        for (key, value) in self.pending.by_ref() {
            self.tree.insert(key, value);
        }
    }
}

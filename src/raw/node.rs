use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;

/// A 2-3 tree node holds one or two pairs.
pub(crate) const MAX_KEYS: usize = 2;
pub(crate) const MIN_KEYS: usize = 1;
pub(crate) const MAX_CHILDREN: usize = MAX_KEYS + 1;

// +1 holds the overflow state between an insert and the split that resolves it.
pub(crate) type Keys<K> = SmallVec<[K; MAX_KEYS + 1]>;
pub(crate) type Values<V> = SmallVec<[V; MAX_KEYS + 1]>;
pub(crate) type Children = SmallVec<[Handle; MAX_CHILDREN + 1]>;

#[derive(Clone)]
pub(crate) enum Node<K, V> {
    Internal(InternalNode<K, V>),
    Leaf(LeafNode<K, V>),
}

// Internal nodes carry full pairs; child[i] holds keys between key[i - 1] and key[i].
#[derive(Clone)]
pub(crate) struct InternalNode<K, V> {
    keys: Keys<K>,
    values: Values<V>,
    children: Children,
}

#[derive(Clone)]
pub(crate) struct LeafNode<K, V> {
    keys: Keys<K>,
    values: Values<V>,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; the index is the insertion point in a leaf or the child to
    /// descend into in an internal node.
    NotFound(usize),
}

impl<K, V> Node<K, V> {
    /// Creates a new empty leaf node.
    pub(crate) fn new_leaf() -> Self {
        Node::Leaf(LeafNode::new())
    }

    /// Returns true if this is a leaf node.
    #[cfg(test)]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Returns the leaf node mutably, panicking if this is not a leaf.
    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode<K, V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the internal node, panicking if this is not internal.
    pub(crate) fn as_internal(&self) -> &InternalNode<K, V> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    /// Returns the internal node mutably, panicking if this is not internal.
    pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode<K, V> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    /// Returns the number of keys in this node.
    pub(crate) fn key_count(&self) -> usize {
        self.keys().len()
    }

    /// Returns all keys.
    pub(crate) fn keys(&self) -> &[K] {
        match self {
            Node::Internal(internal) => &internal.keys,
            Node::Leaf(leaf) => &leaf.keys,
        }
    }

    /// Returns the key at the given index.
    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys()[index]
    }

    /// Returns the value at the given index.
    #[inline]
    pub(crate) fn value(&self, index: usize) -> &V {
        match self {
            Node::Internal(internal) => &internal.values[index],
            Node::Leaf(leaf) => &leaf.values[index],
        }
    }

    /// Returns the value at the given index mutably.
    #[inline]
    pub(crate) fn value_mut(&mut self, index: usize) -> &mut V {
        &mut self.entries_mut().1[index]
    }

    /// Returns true if a sibling may take one pair from this node.
    pub(crate) fn can_lend(&self) -> bool {
        self.key_count() > MIN_KEYS
    }

    /// Returns true if this node has lost its last key.
    pub(crate) fn is_underfull(&self) -> bool {
        self.key_count() < MIN_KEYS
    }

    /// Searches this node's keys.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys().binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::NotFound(idx),
        }
    }

    /// Swaps the pair at `index` for the given one, returning the old pair.
    pub(crate) fn replace_entry(&mut self, index: usize, key: K, value: V) -> (K, V) {
        let (keys, values) = self.entries_mut();
        let old_key = core::mem::replace(&mut keys[index], key);
        let old_value = core::mem::replace(&mut values[index], value);
        (old_key, old_value)
    }

    /// Removes the last pair and, for an internal node, its last child.
    pub(crate) fn pop_back(&mut self) -> (K, V, Option<Handle>) {
        let child = match self {
            Node::Internal(internal) => internal.children.pop(),
            Node::Leaf(_) => None,
        };
        let (keys, values) = self.entries_mut();
        match (keys.pop(), values.pop()) {
            (Some(key), Some(value)) => (key, value, child),
            _ => panic!("`Node::pop_back()` - node has no pairs"),
        }
    }

    /// Removes the first pair and, for an internal node, its first child.
    pub(crate) fn pop_front(&mut self) -> (K, V, Option<Handle>) {
        assert!(self.key_count() > 0, "`Node::pop_front()` - node has no pairs");
        let child = match self {
            Node::Internal(internal) => Some(internal.children.remove(0)),
            Node::Leaf(_) => None,
        };
        let (keys, values) = self.entries_mut();
        (keys.remove(0), values.remove(0), child)
    }

    /// Prepends a pair and, for an internal node, a new first child.
    pub(crate) fn push_front(&mut self, key: K, value: V, child: Option<Handle>) {
        match (&mut *self, child) {
            (Node::Internal(internal), Some(child)) => internal.children.insert(0, child),
            (Node::Leaf(_), None) => {}
            _ => panic!("`Node::push_front()` - child does not match node variant"),
        }
        let (keys, values) = self.entries_mut();
        keys.insert(0, key);
        values.insert(0, value);
    }

    /// Appends a pair and, for an internal node, a new last child.
    pub(crate) fn push_back(&mut self, key: K, value: V, child: Option<Handle>) {
        match (&mut *self, child) {
            (Node::Internal(internal), Some(child)) => internal.children.push(child),
            (Node::Leaf(_), None) => {}
            _ => panic!("`Node::push_back()` - child does not match node variant"),
        }
        let (keys, values) = self.entries_mut();
        keys.push(key);
        values.push(value);
    }

    /// Absorbs the separator pair from the parent followed by every pair and child of
    /// `right`, which must be the same variant.
    pub(crate) fn merge_with_right(&mut self, key: K, value: V, right: Node<K, V>) {
        let (mut right_keys, mut right_values, mut right_children) = right.into_parts();
        match self {
            Node::Internal(internal) => {
                assert!(!right_children.is_empty(), "`Node::merge_with_right()` - variant mismatch");
                internal.children.append(&mut right_children);
            }
            Node::Leaf(_) => assert!(right_children.is_empty(), "`Node::merge_with_right()` - variant mismatch"),
        }
        let (keys, values) = self.entries_mut();
        keys.push(key);
        values.push(value);
        keys.append(&mut right_keys);
        values.append(&mut right_values);
    }

    /// Splits the node into its keys, values and children (empty for a leaf).
    pub(crate) fn into_parts(self) -> (Keys<K>, Values<V>, Children) {
        match self {
            Node::Internal(internal) => (internal.keys, internal.values, internal.children),
            Node::Leaf(leaf) => (leaf.keys, leaf.values, Children::new()),
        }
    }

    fn entries_mut(&mut self) -> (&mut Keys<K>, &mut Values<V>) {
        match self {
            Node::Internal(internal) => (&mut internal.keys, &mut internal.values),
            Node::Leaf(leaf) => (&mut leaf.keys, &mut leaf.values),
        }
    }
}

impl<K, V> InternalNode<K, V> {
    /// Creates a root holding one promoted pair between two subtrees.
    pub(crate) fn new_root(left: Handle, key: K, value: V, right: Handle) -> Self {
        let mut root = Self {
            keys: Keys::new(),
            values: Values::new(),
            children: Children::new(),
        };
        root.keys.push(key);
        root.values.push(value);
        root.children.push(left);
        root.children.push(right);
        root
    }

    /// Returns the number of keys in this node.
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Returns the number of children in this node.
    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns the child handle at the given index.
    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    /// Returns all children.
    #[cfg(test)]
    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    /// Inserts a promoted pair at `index` with `child` as the subtree right of it.
    pub(crate) fn insert_child(&mut self, index: usize, key: K, value: V, child: Handle) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
        self.children.insert(index + 1, child);
    }

    /// Removes the pair at `index` and the child right of it.
    pub(crate) fn remove_child(&mut self, index: usize) -> (K, V, Handle) {
        let key = self.keys.remove(index);
        let value = self.values.remove(index);
        let child = self.children.remove(index + 1);
        (key, value, child)
    }

    /// Splits an overflowing node around its median pair.
    ///
    /// This node keeps the pairs and children left of the median; the returned node
    /// takes those right of it.
    pub(crate) fn split(&mut self) -> (K, V, InternalNode<K, V>) {
        let mid = self.keys.len() / 2;
        let right = InternalNode {
            keys: self.keys.drain(mid + 1..).collect(),
            values: self.values.drain(mid + 1..).collect(),
            children: self.children.drain(mid + 1..).collect(),
        };
        match (self.keys.pop(), self.values.pop()) {
            (Some(key), Some(value)) => (key, value, right),
            _ => panic!("`InternalNode::split()` - node has no median"),
        }
    }
}

impl<K, V> LeafNode<K, V> {
    /// Creates a new empty leaf node.
    pub(crate) fn new() -> Self {
        Self {
            keys: Keys::new(),
            values: Values::new(),
        }
    }

    /// Returns the number of keys in this node.
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Inserts a key and value at the given position.
    pub(crate) fn insert(&mut self, index: usize, key: K, value: V) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    /// Removes the key and value at the given position.
    pub(crate) fn remove(&mut self, index: usize) -> (K, V) {
        (self.keys.remove(index), self.values.remove(index))
    }

    /// Splits an overflowing leaf around its median pair.
    pub(crate) fn split(&mut self) -> (K, V, LeafNode<K, V>) {
        let mid = self.keys.len() / 2;
        let right = LeafNode {
            keys: self.keys.drain(mid + 1..).collect(),
            values: self.values.drain(mid + 1..).collect(),
        };
        match (self.keys.pop(), self.values.pop()) {
            (Some(key), Some(value)) => (key, value, right),
            _ => panic!("`LeafNode::split()` - leaf has no median"),
        }
    }
}

use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use smallvec::SmallVec;

use crate::raw::{Handle, Node, RawTwoThreeMap};

mod capacity;

/// An ordered map stored in a [2-3 tree].
///
/// Every node holds one or two entries and every leaf sits at the same depth, so the
/// height of a map with `n` entries stays between `log3(n + 1) - 1` and
/// `log2(n + 1) - 1`. Internal nodes carry real entries rather than routing copies:
/// a lookup ends at whichever node holds the key, which may be the root.
///
/// Keys are compared with [`Ord`]. Changing a key's ordering while it is in the map
/// (through interior mutability, say) leaves the map unable to find that key and
/// possibly others. It never causes undefined behavior.
///
/// # Examples
///
/// ```
/// use two_three_tree::TwoThreeMap;
///
/// let mut stock = TwoThreeMap::new();
/// stock.insert("bolts", 120);
/// stock.insert("nuts", 80);
/// stock.insert("washers", 300);
///
/// if let Some(count) = stock.get_mut("nuts") {
///     *count -= 30;
/// }
/// assert_eq!(stock["nuts"], 50);
///
/// stock.remove("washers");
/// assert!(!stock.contains_key("washers"));
///
/// let names: Vec<_> = stock.keys().copied().collect();
/// assert_eq!(names, ["bolts", "nuts"]);
/// ```
///
/// Building from an array:
///
/// ```
/// use two_three_tree::TwoThreeMap;
///
/// let ports = TwoThreeMap::from([(443, "https"), (22, "ssh"), (80, "http")]);
/// assert_eq!(ports.first_key_value(), Some((&22, &"ssh")));
/// ```
///
/// [2-3 tree]: https://en.wikipedia.org/wiki/2%E2%80%933_tree
pub struct TwoThreeMap<K, V> {
    raw: RawTwoThreeMap<K, V>,
}

/// Explicit traversal stack: one `(node, next entry index)` frame per level.
type Stack = SmallVec<[(Handle, usize); 16]>;

/// Borrowing iterator over a map's entries in key order, returned by [`TwoThreeMap::iter`].
///
/// It keeps one frame per tree level, so it never allocates for realistic heights.
///
/// ```
/// use two_three_tree::TwoThreeMap;
///
/// let map = TwoThreeMap::from([(2, 'b'), (1, 'a')]);
/// let mut iter = map.iter();
/// assert_eq!(iter.len(), 2);
/// assert_eq!(iter.next(), Some((&1, &'a')));
/// assert_eq!(iter.next(), Some((&2, &'b')));
/// assert_eq!(iter.next(), None);
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: &'a RawTwoThreeMap<K, V>,
    stack: Stack,
    remaining: usize,
}

/// Owning iterator over a map's entries in key order.
///
/// The map is emptied into a buffer up front, so this iterator also runs backwards.
///
/// ```
/// use two_three_tree::TwoThreeMap;
///
/// let map = TwoThreeMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
/// let mut iter = map.into_iter();
/// assert_eq!(iter.next_back(), Some((3, 'c')));
/// assert_eq!(iter.next(), Some((1, 'a')));
/// assert_eq!(iter.len(), 1);
/// ```
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// Keys of a map in ascending order, returned by [`TwoThreeMap::keys`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// Values of a map ordered by their keys, returned by [`TwoThreeMap::values`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> TwoThreeMap<K, V> {
    /// Creates an empty map.
    ///
    /// An empty map is still a tree with one node: the root is an empty leaf, so this
    /// allocates.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map: TwoThreeMap<u32, String> = TwoThreeMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.height(), 0);
    /// ```
    #[must_use]
    pub fn new() -> TwoThreeMap<K, V> {
        TwoThreeMap {
            raw: RawTwoThreeMap::new(),
        }
    }

    /// Drops every entry and shrinks the tree back to a single empty leaf.
    ///
    /// The node arena keeps its allocation for reuse.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut map: TwoThreeMap<i32, i32> = (0..50).map(|k| (k, k)).collect();
    /// map.clear();
    /// assert_eq!((map.len(), map.height()), (0, 0));
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Looks up the value stored under `key`.
    ///
    /// The search descends from the root and stops at the first node holding an equal
    /// key. Since internal nodes hold entries too, that is often above the leaves.
    /// `key` may be any borrowed form of `K` whose ordering agrees with `K`'s.
    ///
    /// # Complexity
    ///
    /// O(log n) comparisons, at most two per level.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map = TwoThreeMap::from([(String::from("x"), 1)]);
    /// assert_eq!(map.get("x"), Some(&1));
    /// assert_eq!(map.get("y"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Like [`get`](Self::get), but also returns the key as stored in the map.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map = TwoThreeMap::from([(7, "seven")]);
    /// assert_eq!(map.get_key_value(&7), Some((&7, &"seven")));
    /// assert_eq!(map.get_key_value(&8), None);
    /// ```
    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(k)
    }

    /// Returns the entry with the smallest key, found at the end of the leftmost spine.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut map = TwoThreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.extend([(5, 'e'), (3, 'c'), (9, 'i')]);
    /// assert_eq!(map.first_key_value(), Some((&3, &'c')));
    /// ```
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Removes the entry with the smallest key and returns it.
    ///
    /// The minimum always lives in the leftmost leaf, so this never needs a predecessor
    /// swap. The leaf is rebalanced if it empties.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut queue = TwoThreeMap::from([(2, "second"), (1, "first"), (3, "third")]);
    /// assert_eq!(queue.pop_first(), Some((1, "first")));
    /// assert_eq!(queue.pop_first(), Some((2, "second")));
    /// assert_eq!(queue.len(), 1);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Returns the entry with the largest key, found at the end of the rightmost spine.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map = TwoThreeMap::from([(5, 'e'), (3, 'c'), (9, 'i')]);
    /// assert_eq!(map.last_key_value(), Some((&9, &'i')));
    /// ```
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Removes the entry with the largest key and returns it.
    ///
    /// Mirror image of [`pop_first`](Self::pop_first): the maximum sits at the right
    /// end of the rightmost leaf.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut map: TwoThreeMap<i32, ()> = (0..10).map(|k| (k, ())).collect();
    /// let mut taken = Vec::new();
    /// while let Some((k, ())) = map.pop_last() {
    ///     taken.push(k);
    /// }
    /// assert_eq!(taken, [9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Reports whether `key` is present.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map = TwoThreeMap::from([('a', 1)]);
    /// assert!(map.contains_key(&'a'));
    /// assert!(!map.contains_key(&'b'));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Looks up `key` and hands out its value for in-place editing.
    ///
    /// Only the value is reachable. Keys stay immutable so the tree's order holds.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut hits = TwoThreeMap::from([("/", 0), ("/about", 0)]);
    /// for path in ["/", "/", "/about", "/missing"] {
    ///     if let Some(n) = hits.get_mut(path) {
    ///         *n += 1;
    ///     }
    /// }
    /// assert_eq!(hits["/"], 2);
    /// assert_eq!(hits["/about"], 1);
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Stores `value` under `key`.
    ///
    /// A new key goes into a leaf. If that leaf now holds three entries it splits in
    /// two and its middle entry moves up into the parent, which may split in turn; a
    /// split of the root adds a level on top. An existing key keeps its stored copy
    /// and only the value is swapped, with the previous value returned.
    ///
    /// # Complexity
    ///
    /// O(log n), including any splits.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut map = TwoThreeMap::new();
    /// assert_eq!(map.insert(10, "ten"), None);
    /// assert_eq!(map.insert(10, "TEN"), Some("ten"));
    /// assert_eq!(map.len(), 1);
    ///
    /// map.insert(20, "twenty");
    /// map.insert(30, "thirty");
    /// assert_eq!(map.height(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        self.raw.insert(key, value)
    }

    /// Deletes `key` and returns the value it held, or `None` if it was absent.
    ///
    /// An entry found in an internal node is replaced by its in-order predecessor from
    /// a leaf. A leaf left empty borrows an entry from a sibling through the parent, or
    /// merges with a sibling when neither can spare one. A root left with no entries is
    /// dropped and the tree gets one level shorter.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut map = TwoThreeMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// assert_eq!(map.remove(&2), Some('b'));
    /// assert_eq!(map.remove(&2), None);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3]);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Same as [`remove`](Self::remove), but gives back the stored key too.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut map = TwoThreeMap::from([(String::from("k"), 1)]);
    /// assert_eq!(map.remove_entry("k"), Some((String::from("k"), 1)));
    /// assert!(map.is_empty());
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key)
    }

    /// Drops every entry for which `f` returns `false`.
    ///
    /// `f` sees the entries in ascending key order and may edit values as it goes. The
    /// map is emptied first and a new tree is grown from the entries `f` keeps. If `f`
    /// panics, the entry it was given and all entries after it are put back; only
    /// entries it already rejected are gone.
    ///
    /// # Complexity
    ///
    /// O(n log n)
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut scores: TwoThreeMap<&str, u32> =
    ///     [("ann", 40), ("bob", 75), ("cy", 90)].into_iter().collect();
    /// scores.retain(|_, score| {
    ///     *score += 5;
    ///     *score >= 50
    /// });
    /// assert_eq!(scores.into_iter().collect::<Vec<_>>(), [("bob", 80), ("cy", 95)]);
    /// ```
    pub fn retain<F>(&mut self, f: F)
    where
        K: Ord,
        F: FnMut(&K, &mut V) -> bool,
    {
        self.raw.retain(f);
    }

    /// Walks the entries in ascending key order.
    ///
    /// An internal entry is yielded between the subtree to its left and the one to its
    /// right.
    ///
    /// # Complexity
    ///
    /// O(height) to start, O(1) amortized per entry.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map: TwoThreeMap<i32, i32> = (0..5).rev().map(|k| (k, k * k)).collect();
    /// let squares: Vec<_> = map.iter().map(|(_, sq)| *sq).collect();
    /// assert_eq!(squares, [0, 1, 4, 9, 16]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// The keys alone, smallest first.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map = TwoThreeMap::from([("b", 2), ("a", 1)]);
    /// assert_eq!(map.keys().collect::<Vec<_>>(), [&"a", &"b"]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// The values alone, in the order of their keys.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map = TwoThreeMap::from([("b", 2), ("a", 1)]);
    /// assert_eq!(map.values().sum::<i32>(), 3);
    /// assert_eq!(map.values().next(), Some(&1));
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Number of entries. Tracked as a counter, so this does not walk the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// `true` when the map holds no entries.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut map = TwoThreeMap::new();
    /// assert!(map.is_empty());
    /// map.insert((), ());
    /// assert!(!map.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of edges from the root down to any leaf.
    ///
    /// All leaves share this depth. A map that fits in its root, including an empty
    /// one, has height 0. `BTreeMap` has no counterpart.
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let mut map = TwoThreeMap::from([(1, ()), (2, ())]);
    /// assert_eq!(map.height(), 0);
    /// map.insert(3, ());
    /// assert_eq!(map.height(), 1);
    /// ```
    #[must_use]
    pub const fn height(&self) -> usize {
        self.raw.height()
    }
}

impl<K: Clone, V: Clone> Clone for TwoThreeMap<K, V> {
    fn clone(&self) -> Self {
        TwoThreeMap {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Hash, V: Hash> Hash for TwoThreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for TwoThreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for TwoThreeMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TwoThreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for TwoThreeMap<K, V> {
    fn default() -> Self {
        TwoThreeMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TwoThreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = TwoThreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for TwoThreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a TwoThreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> IntoIterator for TwoThreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Consumes the map, yielding its entries by ascending key.
    ///
    /// Nodes are torn down in a single in-order pass with no rebalancing, so this is
    /// O(n) rather than n calls to `pop_first`.
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for TwoThreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for TwoThreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(tree: &'a RawTwoThreeMap<K, V>) -> Self {
        let mut iter = Iter {
            tree,
            stack: Stack::new(),
            remaining: tree.len(),
        };
        iter.push_leftmost(tree.root());
        iter
    }

    /// Pushes a frame for `handle` and every leftmost descendant below it.
    fn push_leftmost(&mut self, mut handle: Handle) {
        loop {
            self.stack.push((handle, 0));
            match self.tree.node(handle) {
                Node::Internal(internal) => handle = internal.child(0),
                Node::Leaf(_) => return,
            }
        }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let tree = self.tree;
        loop {
            let (handle, index) = self.stack.last_mut()?;
            let node = tree.node(*handle);
            if *index < node.key_count() {
                let entry = (node.key(*index), node.value(*index));
                *index += 1;
                // The subtree right of this entry comes before the node's next entry.
                if let Node::Internal(internal) = node {
                    let next = internal.child(*index);
                    self.push_leftmost(next);
                }
                self.remaining -= 1;
                return Some(entry);
            }
            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn iter_visits_internal_entries_between_subtrees() {
        let map: TwoThreeMap<i32, i32> = (0..40).rev().map(|k| (k, k)).collect();
        assert!(map.height() >= 2);

        let mut iter = map.iter();
        let mut expected = 0;
        while let Some((key, value)) = iter.next() {
            assert_eq!((*key, *value), (expected, expected));
            expected += 1;
            assert_eq!(iter.len(), 40 - expected as usize);
        }
        assert_eq!(expected, 40);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn iter_is_restartable_by_clone() {
        let map = TwoThreeMap::from([(3, 'c'), (1, 'a'), (2, 'b'), (4, 'd')]);
        let mut iter = map.iter();
        iter.next();
        let rest: Vec<_> = iter.clone().map(|(k, _)| *k).collect();
        assert_eq!(rest, [2, 3, 4]);
        assert_eq!(iter.count(), 3);
    }

    #[test]
    fn empty_map_iterates_nothing() {
        let map: TwoThreeMap<u8, u8> = TwoThreeMap::new();
        assert_eq!(map.iter().next(), None);
        assert_eq!(map.keys().len(), 0);
        assert_eq!(map.into_iter().len(), 0);
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_missing_key_panics() {
        let map = TwoThreeMap::from([(1, "a")]);
        let _ = map[&2];
    }
}

use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::TwoThreeMap;
use crate::two_three_map::{IntoIter as MapIntoIter, Keys};

mod capacity;

/// An ordered set of distinct values, kept as the keys of a [`TwoThreeMap`] with `()`
/// values.
///
/// The shape guarantees are the map's: every leaf at one depth, one or two elements
/// per node. Mutating an element so that its ordering changes while it is stored
/// leaves the set unable to find it. Memory safety is unaffected.
///
/// ```
/// use two_three_tree::TwoThreeSet;
///
/// let mut seen = TwoThreeSet::new();
/// for word in "the cat saw the other cat".split(' ') {
///     seen.insert(word);
/// }
/// assert_eq!(seen.len(), 4);
/// assert!(seen.contains("saw"));
///
/// seen.remove("the");
/// assert_eq!(seen.iter().copied().collect::<Vec<_>>(), ["cat", "other", "saw"]);
/// ```
pub struct TwoThreeSet<T> {
    map: TwoThreeMap<T, ()>,
}

/// Borrowing iterator over a set, smallest element first. See [`TwoThreeSet::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: Keys<'a, T, ()>,
}

/// Owning iterator over a set's elements in ascending order. Runs from either end.
///
/// ```
/// use two_three_tree::TwoThreeSet;
///
/// let mut iter = TwoThreeSet::from(['c', 'a', 'b']).into_iter();
/// assert_eq!(iter.next_back(), Some('c'));
/// assert_eq!(iter.collect::<String>(), "ab");
/// ```
pub struct IntoIter<T> {
    inner: MapIntoIter<T, ()>,
}

impl<T> TwoThreeSet<T> {
    /// Creates an empty set backed by a single empty leaf.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let set: TwoThreeSet<i32> = TwoThreeSet::new();
    /// assert_eq!(set.first(), None);
    /// ```
    #[must_use]
    pub fn new() -> TwoThreeSet<T> {
        TwoThreeSet {
            map: TwoThreeMap::new(),
        }
    }

    /// Drops every element. The set is back to height 0 afterwards.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Reports whether an element equal to `value` is stored.
    ///
    /// `value` can be a borrowed form of `T`, such as `&str` for a set of `String`,
    /// provided both order the same way.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let tags: TwoThreeSet<String> = ["red", "blue"].map(String::from).into();
    /// assert!(tags.contains("red"));
    /// assert!(!tags.contains("green"));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.contains_key(value)
    }

    /// Returns the stored element equal to `value`.
    ///
    /// Useful when equal elements can still differ, since the first one inserted is
    /// the one kept.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.get_key_value(value).map(|(k, ())| k)
    }

    /// The smallest element.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let set = TwoThreeSet::from([8, 3, 5]);
    /// assert_eq!(set.first(), Some(&3));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, ())| k)
    }

    /// The largest element.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let set = TwoThreeSet::from([8, 3, 5]);
    /// assert_eq!(set.last(), Some(&8));
    /// assert_eq!(TwoThreeSet::<u8>::new().last(), None);
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(k, ())| k)
    }

    /// Takes the smallest element out of the set.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let mut set: TwoThreeSet<u32> = (1..=20).collect();
    /// let low: Vec<_> = (0..3).filter_map(|_| set.pop_first()).collect();
    /// assert_eq!(low, [1, 2, 3]);
    /// assert_eq!(set.len(), 17);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(k, ())| k)
    }

    /// Takes the largest element out of the set.
    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(k, ())| k)
    }

    /// Adds `value` unless an equal element is already stored.
    ///
    /// Returns `true` when the set grew. On `false` the stored element is left alone
    /// and `value` is dropped.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let mut set = TwoThreeSet::new();
    /// assert!(set.insert("x"));
    /// assert!(!set.insert("x"));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        self.map.insert(value, ()).is_none()
    }

    /// Drops the element equal to `value`, reporting whether there was one.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let mut set = TwoThreeSet::from([4, 5]);
    /// assert!(set.remove(&4));
    /// assert!(!set.remove(&4));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.remove(value).is_some()
    }

    /// Like [`remove`](Self::remove), but hands the stored element back.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let mut set = TwoThreeSet::from([String::from("keep"), String::from("move")]);
    /// let moved: Option<String> = set.take("move");
    /// assert_eq!(moved.as_deref(), Some("move"));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.remove_entry(value).map(|(k, ())| k)
    }

    /// Keeps the elements `f` accepts and drops the rest.
    ///
    /// Elements are offered in ascending order and the tree is rebuilt from the ones
    /// kept. A panic in `f` keeps the element being tested and everything after it.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let mut set: TwoThreeSet<i32> = (-5..=5).collect();
    /// set.retain(|n| n.is_positive());
    /// assert_eq!(set.into_iter().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        T: Ord,
        F: FnMut(&T) -> bool,
    {
        self.map.retain(|k, ()| f(k));
    }

    /// Walks the elements from smallest to largest.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let set = TwoThreeSet::from([30, 10, 20]);
    /// let mut iter = set.iter();
    /// assert_eq!(iter.next(), Some(&10));
    /// assert_eq!(iter.len(), 2);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.map.keys(),
        }
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Depth of the leaves below the root. `BTreeSet` has no equivalent.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.map.height()
    }
}

impl<T: Hash> Hash for TwoThreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<T: PartialEq> PartialEq for TwoThreeSet<T> {
    fn eq(&self, other: &TwoThreeSet<T>) -> bool {
        self.map == other.map
    }
}

impl<T: Eq> Eq for TwoThreeSet<T> {}

impl<T: Clone> Clone for TwoThreeSet<T> {
    fn clone(&self) -> Self {
        TwoThreeSet {
            map: self.map.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TwoThreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for TwoThreeSet<T> {
    fn default() -> Self {
        TwoThreeSet::new()
    }
}

impl<T: Ord> FromIterator<T> for TwoThreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = TwoThreeSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for TwoThreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for TwoThreeSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a TwoThreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for TwoThreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consumes the set, yielding its elements in ascending order.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.inner).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back().map(|(k, ())| k)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

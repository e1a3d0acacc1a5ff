use super::TwoThreeSet;
use crate::TwoThreeMap;

impl<T> TwoThreeSet<T> {
    /// Creates an empty set that can grow to `capacity` elements without
    /// reallocating its node arena.
    ///
    /// ```
    /// use two_three_tree::TwoThreeSet;
    ///
    /// let set: TwoThreeSet<i32> = TwoThreeSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 16);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TwoThreeSet {
            map: TwoThreeMap::with_capacity(capacity),
        }
    }

    /// Node slots allocated for the set.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }
}

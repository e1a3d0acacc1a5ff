use super::TwoThreeMap;
use crate::raw::RawTwoThreeMap;

impl<K, V> TwoThreeMap<K, V> {
    /// Creates an empty map whose node arena has room for `capacity` nodes.
    ///
    /// No node is ever empty once the map has entries, so `capacity` nodes are
    /// enough for `capacity` entries and filling the map up to that size does not
    /// reallocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map: TwoThreeMap<i32, i32> = TwoThreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TwoThreeMap {
            raw: RawTwoThreeMap::with_capacity(capacity),
        }
    }

    /// Node slots allocated in the arena, live or free. Counts nodes, not entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use two_three_tree::TwoThreeMap;
    ///
    /// let map: TwoThreeMap<i32, i32> = TwoThreeMap::with_capacity(32);
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

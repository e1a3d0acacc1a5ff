mod common;

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::panic::{AssertUnwindSafe, catch_unwind};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use two_three_tree::TwoThreeMap;
use two_three_tree::two_three_map;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a range smaller than `TEST_SIZE` so inserts collide and removes hit.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    RemoveEntry(i64),
    Get(i64),
    GetMut(i64, i64),
    ContainsKey(i64),
    GetKeyValue(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::RemoveEntry),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::GetMut(k, v)),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

/// Smallest and largest heights a 2-3 tree of `len` entries can have.
fn height_bounds(len: usize) -> (usize, usize) {
    let (mut min, mut max) = (0, 0);
    // A tree of height h holds between 2^(h+1) - 1 and 3^(h+1) - 1 entries.
    while 3usize.pow(u32::try_from(min).unwrap() + 1) - 1 < len {
        min += 1;
    }
    while 2usize.pow(u32::try_from(max).unwrap() + 2) - 1 <= len {
        max += 1;
    }
    (min, max)
}

// ─── Fixed scenarios ─────────────────────────────────────────────────────────

#[test]
fn new_map_get_returns_none() {
    common::init_tracing();
    let map: TwoThreeMap<i32, &str> = TwoThreeMap::new();
    assert_eq!(map.get(&1), None);
    assert_eq!(map.len(), 0);
    assert_eq!(map.height(), 0);
    assert_eq!(map.iter().next(), None);
}

#[test]
fn scenario_insert_traverse_delete() {
    common::init_tracing();
    let mut map = TwoThreeMap::new();
    for key in [10, 20, 5, 6, 12, 30, 7, 17] {
        assert_eq!(map.insert(key, key * 100), None);
    }

    let keys: Vec<i32> = map.keys().copied().collect();
    assert_eq!(keys, vec![5, 6, 7, 10, 12, 17, 20, 30]);
    assert_eq!(map.len(), 8);
    let (min_height, max_height) = height_bounds(map.len());
    assert!((min_height..=max_height).contains(&map.height()));

    assert_eq!(map.remove(&10), Some(1000));
    assert_eq!(map.get(&10), None);
    for key in [5, 6, 7, 12, 17, 20, 30] {
        assert_eq!(map.get(&key), Some(&(key * 100)), "key {key} lost after delete");
    }
    assert_eq!(map.len(), 7);
}

#[test]
fn insert_existing_key_overwrites_value() {
    let mut map = TwoThreeMap::new();
    assert_eq!(map.insert("k", 1), None);
    assert_eq!(map.insert("k", 2), Some(1));
    assert_eq!(map.len(), 1);
    assert_eq!(map["k"], 2);
}

#[test]
fn remove_absent_key_is_a_no_op() {
    let mut map: TwoThreeMap<i32, i32> = (0..20).map(|k| (k * 2, k)).collect();
    let before = map.clone();
    let height = map.height();

    assert_eq!(map.remove(&7), None);
    assert_eq!(map.remove(&-1), None);
    assert_eq!(map.remove(&100), None);

    assert_eq!(map, before);
    assert_eq!(map.height(), height);
}

#[test]
fn ascending_and_descending_inserts_stay_balanced() {
    common::init_tracing();
    let ascending: TwoThreeMap<u32, ()> = (0..5_000).map(|k| (k, ())).collect();
    let descending: TwoThreeMap<u32, ()> = (0..5_000).rev().map(|k| (k, ())).collect();

    for map in [&ascending, &descending] {
        let (min_height, max_height) = height_bounds(map.len());
        assert!(
            (min_height..=max_height).contains(&map.height()),
            "height {} outside [{min_height}, {max_height}]",
            map.height()
        );
        assert!(map.keys().copied().eq(0..5_000));
    }
}

#[test]
fn height_returns_to_zero_after_removing_everything() {
    let mut map: TwoThreeMap<i32, i32> = (0..1_000).map(|k| (k, k)).collect();
    assert!(map.height() > 0);
    for key in (0..1_000).step_by(2).chain((1..1_000).step_by(2)) {
        assert_eq!(map.remove(&key), Some(key));
    }
    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
    assert_eq!(map.first_key_value(), None);

    map.insert(1, 1);
    assert_eq!(map.get(&1), Some(&1));
}

#[test]
fn borrowed_key_lookups() {
    let mut map: TwoThreeMap<String, usize> = TwoThreeMap::new();
    for word in ["pear", "apple", "fig", "kiwi", "plum"] {
        map.insert(word.to_string(), word.len());
    }
    assert_eq!(map.get("fig"), Some(&3));
    assert!(map.contains_key("kiwi"));
    assert_eq!(map.get_key_value("plum"), Some((&"plum".to_string(), &4)));
    assert_eq!(map.remove("apple"), Some(5));
    assert_eq!(map.remove_entry("pear"), Some(("pear".to_string(), 4)));
    assert_eq!(map.keys().cloned().collect::<Vec<_>>(), ["fig", "kiwi", "plum"]);
}

#[test]
fn debug_formats_like_a_map() {
    let map = TwoThreeMap::from([(2, 'b'), (1, 'a')]);
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
    assert_eq!(format!("{:?}", map.keys()), "[1, 2]");
    assert_eq!(format!("{:?}", map.values()), "['a', 'b']");
}

#[test]
fn with_capacity_does_not_grow_when_filled() {
    let mut map = TwoThreeMap::with_capacity(500);
    let capacity = map.capacity();
    assert!(capacity >= 500);
    for key in 0..500 {
        map.insert(key, key);
    }
    assert_eq!(map.capacity(), capacity);
}

#[test]
fn default_into_iter_is_empty() {
    let map: TwoThreeMap<u8, u8> = TwoThreeMap::default();
    let iter: two_three_map::IntoIter<u8, u8> = map.into_iter();
    assert_eq!(iter.len(), 0);
}

#[test]
fn retain_keeps_unvisited_entries_when_predicate_panics() {
    common::init_tracing();
    let mut tt_map: TwoThreeMap<i32, i32> = (0..10).map(|k| (k, k)).collect();
    let mut bt_map: BTreeMap<i32, i32> = (0..10).map(|k| (k, k)).collect();

    let tt_result = catch_unwind(AssertUnwindSafe(|| {
        tt_map.retain(|&k, _| if k == 3 { panic!("predicate failed at {k}") } else { k != 1 });
    }));
    let bt_result = catch_unwind(AssertUnwindSafe(|| {
        bt_map.retain(|&k, _| if k == 3 { panic!("predicate failed at {k}") } else { k != 1 });
    }));
    assert!(tt_result.is_err());
    assert!(bt_result.is_err());

    assert_eq!(tt_map.len(), bt_map.len());
    assert_eq!(tt_map.iter().collect::<Vec<_>>(), bt_map.iter().collect::<Vec<_>>());
    assert_eq!(tt_map.keys().copied().collect::<Vec<_>>(), vec![0, 2, 3, 4, 5, 6, 7, 8, 9]);

    tt_map.insert(1, 1);
    assert_eq!(tt_map.len(), 10);
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Replays a random sequence of operations on both TwoThreeMap and BTreeMap and
    /// asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut tt_map: TwoThreeMap<i64, i64> = TwoThreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(tt_map.insert(*k, *v), bt_map.insert(*k, *v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(tt_map.remove(k), bt_map.remove(k), "remove({})", k);
                }
                MapOp::RemoveEntry(k) => {
                    prop_assert_eq!(tt_map.remove_entry(k), bt_map.remove_entry(k), "remove_entry({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(tt_map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::GetMut(k, v) => {
                    if let Some(value) = tt_map.get_mut(k) {
                        *value = *v;
                    }
                    if let Some(value) = bt_map.get_mut(k) {
                        *value = *v;
                    }
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(tt_map.contains_key(k), bt_map.contains_key(k), "contains_key({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(tt_map.get_key_value(k), bt_map.get_key_value(k), "get_key_value({})", k);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(tt_map.first_key_value(), bt_map.first_key_value());
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(tt_map.last_key_value(), bt_map.last_key_value());
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(tt_map.pop_first(), bt_map.pop_first());
                }
                MapOp::PopLast => {
                    prop_assert_eq!(tt_map.pop_last(), bt_map.pop_last());
                }
            }
            prop_assert_eq!(tt_map.len(), bt_map.len());
        }

        prop_assert!(tt_map.iter().eq(bt_map.iter()));
        let (min_height, max_height) = height_bounds(tt_map.len());
        prop_assert!((min_height..=max_height).contains(&tt_map.height()));
    }

    /// Iteration yields strictly increasing keys with an exact remaining count.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let tt_map: TwoThreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let mut iter = tt_map.iter();
        prop_assert_eq!(iter.len(), bt_map.len());
        let mut previous: Option<i64> = None;
        let mut count = 0;
        while let Some((k, _)) = iter.next() {
            prop_assert!(previous.is_none_or(|p| p < *k), "keys out of order");
            previous = Some(*k);
            count += 1;
            prop_assert_eq!(iter.len(), bt_map.len() - count);
        }
        prop_assert_eq!(iter.next(), None);

        prop_assert!(tt_map.keys().eq(bt_map.keys()));
        prop_assert!(tt_map.values().eq(bt_map.values()));
        prop_assert!((&tt_map).into_iter().eq(&bt_map));
        prop_assert!(tt_map.into_iter().eq(bt_map.into_iter()));
    }

    /// Every key inserted is retrievable with its last value; removed keys are gone and
    /// the rest keep their values.
    #[test]
    fn removals_leave_other_keys_intact(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE),
        removals in proptest::collection::vec(key_strategy(), 0..TEST_SIZE / 2),
    ) {
        let mut tt_map: TwoThreeMap<i64, i64> = entries.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        for (k, v) in &bt_map {
            prop_assert_eq!(tt_map.get(k), Some(v));
        }
        for k in &removals {
            prop_assert_eq!(tt_map.remove(k), bt_map.remove(k));
            prop_assert_eq!(tt_map.get(k), None);
        }
        for (k, v) in &bt_map {
            prop_assert_eq!(tt_map.get(k), Some(v));
        }
        prop_assert_eq!(tt_map.len(), tt_map.iter().count());
    }

    #[test]
    fn retain_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut tt_map: TwoThreeMap<i64, i64> = entries.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        tt_map.retain(|k, v| {
            *v = v.wrapping_add(1);
            k % 3 != 0
        });
        bt_map.retain(|k, v| {
            *v = v.wrapping_add(1);
            k % 3 != 0
        });
        prop_assert!(tt_map.iter().eq(bt_map.iter()));
        prop_assert_eq!(tt_map.len(), bt_map.len());
    }

    #[test]
    fn clear_empties_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut tt_map: TwoThreeMap<i64, i64> = entries.into_iter().collect();
        tt_map.clear();
        prop_assert!(tt_map.is_empty());
        prop_assert_eq!(tt_map.height(), 0);
        prop_assert_eq!(tt_map.iter().next(), None);
    }

    #[test]
    fn clone_produces_equal_independent_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let original: TwoThreeMap<i64, i64> = entries.into_iter().collect();
        let mut cloned = original.clone();
        prop_assert_eq!(&original, &cloned);
        prop_assert_eq!(hash_of(&original), hash_of(&cloned));

        if let Some((k, _)) = cloned.pop_first() {
            prop_assert!(original.contains_key(&k));
            prop_assert_ne!(&original, &cloned);
        }
    }

    /// Maps built in different insertion orders compare and hash equal.
    #[test]
    fn eq_and_hash_ignore_insertion_order(entries in proptest::collection::btree_map(key_strategy(), value_strategy(), 0..TEST_SIZE)) {
        let forward: TwoThreeMap<i64, i64> = entries.iter().map(|(k, v)| (*k, *v)).collect();
        let backward: TwoThreeMap<i64, i64> = entries.iter().rev().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(hash_of(&forward), hash_of(&backward));
    }

    #[test]
    fn index_by_key_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let tt_map: TwoThreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();
        for k in bt_map.keys() {
            prop_assert_eq!(tt_map[k], bt_map[k]);
        }
    }

    #[test]
    fn extend_matches_btreemap(
        first in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE),
        second in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE),
    ) {
        let mut tt_map: TwoThreeMap<i64, i64> = first.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = first.iter().copied().collect();
        tt_map.extend(second.iter().copied());
        bt_map.extend(second.iter().copied());
        prop_assert!(tt_map.iter().eq(bt_map.iter()));
    }
}

//! Operation-sequence tests driving the public map API, re-checking the
//! structural invariants after every mutation.

use tstrie::{
    tests_common::{generate_keys_fixed_length, generate_keys_skewed, DICTIONARY},
    visitor::WellFormedChecker,
    TstMap,
};

/// One mutation of an op-sequence run.
#[derive(Debug, Clone, Copy)]
enum Op {
    Insert(&'static str, usize),
    Remove(&'static str),
}

fn run_ops(ops: &[Op]) -> TstMap<usize> {
    let mut map = TstMap::new();
    let mut model = std::collections::BTreeMap::new();

    for op in ops {
        match *op {
            Op::Insert(key, value) => {
                let existing = map.try_insert(key, value).unwrap();
                assert_eq!(existing, model.insert(key.to_string(), value), "{op:?}");
            },
            Op::Remove(key) => {
                assert_eq!(map.remove(key), model.remove(key), "{op:?}");
            },
        }

        assert_eq!(WellFormedChecker::check(&map), Ok(()), "after {op:?}");
        assert_eq!(map.len(), model.len(), "after {op:?}");

        let mut keys: Vec<_> = map.keys().collect();
        keys.sort();
        let expected: Vec<_> = model.keys().cloned().collect();
        assert_eq!(keys, expected, "after {op:?}");
    }

    map
}

#[test]
fn interleaved_inserts_and_removes_stay_consistent() {
    run_ops(&[
        Op::Insert("foo", 1),
        Op::Insert("fore", 2),
        Op::Insert("fobe", 3),
        Op::Remove("fore"),
        Op::Insert("fooooo", 4),
        Op::Insert("bar", 5),
        Op::Remove("foo"),
        Op::Insert("baz", 6),
        Op::Remove("missing"),
        Op::Insert("foo", 7),
        Op::Remove("fobe"),
        Op::Remove("bar"),
        Op::Remove("baz"),
        Op::Remove("fooooo"),
        Op::Remove("foo"),
    ]);
}

#[test]
fn unicode_ops_stay_consistent() {
    run_ops(&[
        Op::Insert("😀", 1),
        Op::Insert("😀😀", 2),
        Op::Insert("日本", 3),
        Op::Insert("日本語", 4),
        Op::Remove("日本"),
        Op::Remove("😀"),
        Op::Insert("für", 5),
        Op::Remove("日本語"),
        Op::Remove("😀😀"),
        Op::Remove("für"),
    ]);
}

#[test]
fn prefix_query_over_mixed_dictionary() {
    let mut map = TstMap::new();
    for key in ["foo", "fore", "fobe", "fooooo", "bar", "baz"] {
        map.insert(key, ());
    }

    let mut matches: Vec<_> = map.prefix_keys("fo").collect();
    matches.sort();
    assert_eq!(matches, ["fobe", "foo", "fooooo", "fore"]);

    // Absent prefixes produce empty sequences, never errors.
    assert_eq!(map.prefix_keys("quux").count(), 0);
    assert_eq!(map.prefix_keys("fooz").count(), 0);
}

#[test]
fn dense_key_set_round_trips_through_every_query() {
    let keys = generate_keys_fixed_length(3, &['a', 'b', 'c', 'd']);

    let mut map = TstMap::new();
    for (index, key) in keys.iter().enumerate() {
        assert_eq!(map.try_insert(key, index), Ok(None));
    }
    assert_eq!(map.len(), keys.len());
    assert_eq!(WellFormedChecker::check(&map), Ok(()));

    for (index, key) in keys.iter().enumerate() {
        assert_eq!(map.get(key), Some(&index));
        assert!(map.contains_key(key));
    }

    // Every length-2 prefix matches exactly the 4 extensions below it.
    for prefix in generate_keys_fixed_length(2, &['a', 'b', 'c', 'd']) {
        assert_eq!(map.prefix_keys(&prefix).count(), 4, "prefix {prefix}");
    }

    for key in &keys {
        assert!(map.remove(key).is_some());
    }
    assert!(map.is_empty());
    assert_eq!(WellFormedChecker::check(&map), Ok(()));
}

#[test]
fn skewed_chain_survives_removal_from_both_ends() {
    let keys: Vec<_> = generate_keys_skewed(16).collect();

    let mut map = TstMap::new();
    for key in &keys {
        map.insert(key, key.len());
    }

    // Remove from the deep end first, then from the shallow end.
    for key in keys.iter().rev().take(8) {
        assert_eq!(map.remove(key), Some(key.len()));
        assert_eq!(WellFormedChecker::check(&map), Ok(()));
    }
    for key in keys.iter().take(8) {
        assert_eq!(map.remove(key), Some(key.len()));
        assert_eq!(WellFormedChecker::check(&map), Ok(()));
    }
    assert!(map.is_empty());
}

#[test]
fn dictionary_clone_and_into_iter_agree() {
    let mut map = TstMap::new();
    for (index, key) in DICTIONARY.iter().copied().enumerate() {
        map.insert(key, index);
    }

    let copy = map.clone();
    assert_eq!(WellFormedChecker::check(&copy), Ok(()));
    assert_eq!(copy, map);

    let mut original: Vec<_> = map.into_iter().collect();
    let mut cloned: Vec<_> = copy.into_iter().collect();
    original.sort();
    cloned.sort();
    assert_eq!(original, cloned);
}

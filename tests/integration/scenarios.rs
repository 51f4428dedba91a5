//! Reference scenarios for lookup, frequency loading, and marker validation.

use repart::{Minimizer, RepartError, RepartitionTable};

use crate::common::{scenario_a, scenario_b, scenario_c, Fixture, SCENARIO_ORDER};

// ============================================================================
// SCENARIO A: plain table
// ============================================================================

#[test]
fn scenario_a_in_range_keys_return_file_values() {
    let fx = Fixture::new();
    let table = RepartitionTable::new(scenario_a(&fx));

    assert_eq!(table.get(0).unwrap(), 2);
    assert_eq!(table.get(1).unwrap(), 0);
    assert_eq!(table.get(2).unwrap(), 3);
}

#[test]
fn scenario_a_out_of_range_keys_return_zero() {
    let fx = Fixture::new();
    let table = RepartitionTable::new(scenario_a(&fx));

    assert_eq!(table.get(3).unwrap(), 0);
    assert_eq!(table.get(5).unwrap(), 0);
    assert_eq!(table.get(u64::MAX).unwrap(), 0);
}

#[test]
fn scenario_a_header_round_trips() {
    let fx = Fixture::new();
    let table = RepartitionTable::new(scenario_a(&fx));

    assert_eq!(table.partition_count().unwrap(), 4);
    assert_eq!(table.minimizer_count().unwrap(), 3);
    assert_eq!(table.pass_count().unwrap(), 1);
    assert!(!table.has_frequency().unwrap());
    assert_eq!(table.lookup().unwrap(), &[2, 0, 3]);
    assert_eq!(table.frequency_order().unwrap(), None);

    let mut rewritten = Vec::new();
    table.header().unwrap().write(&mut rewritten).unwrap();
    let original = std::fs::read(table.path()).unwrap();
    assert_eq!(&original[..rewritten.len()], &rewritten[..]);
}

#[test]
fn scenario_a_key_source_lookup_matches_raw_lookup() {
    let fx = Fixture::new();
    let table = RepartitionTable::new(scenario_a(&fx));

    for raw in 0u64..6 {
        let by_value = table.get(raw).unwrap();
        assert_eq!(table.get_by_key(&Minimizer::new(raw)).unwrap(), by_value);
        assert_eq!(table.get_by_key(&raw).unwrap(), by_value);
        assert_eq!(table.get_by_key(&(raw as u32)).unwrap(), by_value);
    }

    // "C" packs to 1
    let c = Minimizer::from_ascii(b"C").unwrap();
    assert_eq!(table.get_by_key(&c).unwrap(), 0);
    // "T" packs to 3, out of range
    let t = Minimizer::from_ascii(b"T").unwrap();
    assert_eq!(table.get_by_key(&t).unwrap(), 0);
}

// ============================================================================
// SCENARIO B: table with frequency order
// ============================================================================

#[test]
fn scenario_b_duplicate_carries_full_frequency_order() {
    let fx = Fixture::new();
    let (table_path, freq_path) = scenario_b(&fx);

    let table = RepartitionTable::with_frequency(&table_path, &freq_path);
    table.load().unwrap();
    let duplicate = table.clone();

    assert_eq!(duplicate.frequency_order().unwrap(), Some(&SCENARIO_ORDER[..]));
    assert_eq!(duplicate.frequency_rank(0).unwrap(), Some(10));
    assert_eq!(duplicate.frequency_rank(2).unwrap(), Some(30));
}

#[test]
fn scenario_b_without_frequency_path_has_no_order() {
    let fx = Fixture::new();
    let (table_path, _) = scenario_b(&fx);

    let table = RepartitionTable::new(&table_path);
    assert!(table.has_frequency().unwrap());
    assert_eq!(table.frequency_order().unwrap(), None);
    assert_eq!(table.frequency_rank(0).unwrap(), None);
}

// ============================================================================
// SCENARIO C: bad marker
// ============================================================================

#[test]
fn scenario_c_fails_with_bad_magic() {
    let fx = Fixture::new();
    let path = scenario_c(&fx);
    let table = RepartitionTable::new(&path);

    match table.get(0) {
        Err(RepartError::BadMagic { path: failed, found }) => {
            assert_eq!(failed, path);
            assert_eq!(found, 0xDEAD_BEEF);
        }
        other => panic!("expected BadMagic, got {other:?}"),
    }
}

#[test]
fn scenario_c_leaves_nothing_queryable() {
    let fx = Fixture::new();
    let table = RepartitionTable::new(scenario_c(&fx));

    assert!(table.load().is_err());
    assert!(!table.is_loaded());
    assert!(table.is_poisoned());
    assert!(table.get(0).is_err());
    assert!(table.lookup().is_err());
    assert!(table.partitions(&[0, 1, 2]).is_err());
}

#[test]
fn scenario_c_eager_open_fails() {
    let fx = Fixture::new();
    let err = RepartitionTable::open(scenario_c(&fx), None::<&str>).unwrap_err();
    assert!(err.is_format_error());
    assert!(err.to_string().contains("possibly due to bad format"));
}

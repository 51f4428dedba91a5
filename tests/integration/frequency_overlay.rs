//! Frequency overlay: when it is read, when it is skipped, and how duplicates
//! own it.

use repart::{RepartError, RepartitionTable};

use crate::common::{encode_frequency_with_marker, scenario_b, Fixture, SCENARIO_LOOKUP};

#[test]
fn flag_unset_never_opens_frequency_file() {
    let fx = Fixture::new();
    let table_path = fx.table("t.repart", 4, &SCENARIO_LOOKUP, false);
    // Nonexistent frequency file: opening it would fail the load
    let table = RepartitionTable::with_frequency(&table_path, fx.missing("nope.freq"));

    assert_eq!(table.get(0).unwrap(), 2);
    assert_eq!(table.frequency_order().unwrap(), None);
}

#[test]
fn flag_unset_ignores_corrupt_frequency_file() {
    let fx = Fixture::new();
    let table_path = fx.table("t.repart", 4, &SCENARIO_LOOKUP, false);
    let freq_path = fx.write("bad.freq", &[0xAB; 5]);

    let table = RepartitionTable::with_frequency(&table_path, &freq_path);
    assert!(table.load().is_ok());
    assert_eq!(table.frequency_order().unwrap(), None);
}

#[test]
fn flag_set_with_missing_frequency_file_fails() {
    let fx = Fixture::new();
    let table_path = fx.table("t.repart", 4, &SCENARIO_LOOKUP, true);
    let freq_path = fx.missing("gone.freq");

    let table = RepartitionTable::with_frequency(&table_path, &freq_path);
    match table.load() {
        Err(RepartError::Open { path, .. }) => assert_eq!(path, freq_path),
        other => panic!("expected Open error, got {other:?}"),
    }
    assert!(table.is_poisoned());
}

#[test]
fn frequency_marker_error_names_frequency_file() {
    let fx = Fixture::new();
    let table_path = fx.table("t.repart", 4, &SCENARIO_LOOKUP, true);
    let freq_path = fx.write(
        "t.freq",
        &encode_frequency_with_marker(&[10, 20, 30], 0x8765_4321),
    );

    let table = RepartitionTable::with_frequency(&table_path, &freq_path);
    let err = table.load().unwrap_err();
    match &err {
        RepartError::BadMagic { path, found } => {
            assert_eq!(path, &freq_path);
            assert_eq!(*found, 0x8765_4321);
        }
        other => panic!("expected BadMagic, got {other:?}"),
    }
    assert!(err.to_string().contains("t.freq"));

    // No frequency data leaks out and the lookup is not served either
    assert!(table.frequency_order().is_err());
    assert!(table.get(0).is_err());
}

#[test]
fn short_frequency_file_is_truncated() {
    let fx = Fixture::new();
    let table_path = fx.table("t.repart", 4, &SCENARIO_LOOKUP, true);
    let freq_path = fx.frequency("t.freq", &[10, 20]);

    let err = RepartitionTable::open(&table_path, Some(&freq_path)).unwrap_err();
    assert!(matches!(
        err,
        RepartError::Truncated {
            section: "frequency order",
            ..
        }
    ));
}

#[test]
fn duplicates_own_independent_frequency_buffers() {
    let fx = Fixture::new();
    let (table_path, freq_path) = scenario_b(&fx);

    let mut original = RepartitionTable::open(&table_path, Some(&freq_path)).unwrap();
    let duplicate = original.clone();

    let original_ptr = original.frequency_order().unwrap().unwrap().as_ptr();
    let duplicate_ptr = duplicate.frequency_order().unwrap().unwrap().as_ptr();
    assert_ne!(original_ptr, duplicate_ptr);

    let order = original.data_mut().unwrap().frequency_order_mut().unwrap();
    order.iter_mut().for_each(|rank| *rank += 1);

    assert_eq!(original.frequency_order().unwrap(), Some(&[11, 21, 31][..]));
    assert_eq!(duplicate.frequency_order().unwrap(), Some(&[10, 20, 30][..]));
}

#[test]
fn duplicate_copies_every_element_of_large_order() {
    let fx = Fixture::new();
    let n = 10_000usize;
    let lookup: Vec<u16> = (0..n).map(|m| (m % 13) as u16).collect();
    let order: Vec<u32> = (0..n as u32).rev().collect();
    let table_path = fx.table("big.repart", 13, &lookup, true);
    let freq_path = fx.frequency("big.freq", &order);

    let table = RepartitionTable::open(&table_path, Some(&freq_path)).unwrap();
    let duplicate = table.clone();
    drop(table);

    let copied = duplicate.frequency_order().unwrap().unwrap();
    assert_eq!(copied.len(), n);
    assert_eq!(copied, &order[..]);
    // The last element is the one an off-by-one copy would drop
    assert_eq!(duplicate.frequency_rank(n as u64 - 1).unwrap(), Some(0));
}

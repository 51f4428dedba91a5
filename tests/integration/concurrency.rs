//! Shared tables under concurrent first use.

use std::sync::Arc;
use std::thread;

use repart::RepartitionTable;

use crate::common::{round_robin_lookup, scenario_b, Fixture};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn table_is_send_and_sync() {
    assert_send_sync::<RepartitionTable>();
}

#[test]
fn concurrent_first_queries_agree() {
    let fx = Fixture::new();
    let lookup = round_robin_lookup(4096, 16);
    let path = fx.table("shared.repart", 16, &lookup, false);
    let table = Arc::new(RepartitionTable::new(&path));

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                (0..4096u64)
                    .skip(t as usize)
                    .step_by(8)
                    .map(|key| (key, table.get(key).unwrap()))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for (key, part) in handle.join().unwrap() {
            assert_eq!(part, (key % 16) as u16);
        }
    }
    assert!(table.is_loaded());
}

#[test]
fn concurrent_failures_all_report_errors() {
    let fx = Fixture::new();
    let table = RepartitionTable::new(fx.missing("absent.repart"));

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| assert!(table.get(0).is_err()));
        }
    });
    assert!(table.is_poisoned());
}

#[test]
fn scoped_workers_share_frequency_overlay() {
    let fx = Fixture::new();
    let (table_path, freq_path) = scenario_b(&fx);
    let table = RepartitionTable::with_frequency(&table_path, &freq_path);

    let ranks: Vec<Option<u32>> = thread::scope(|s| {
        let workers: Vec<_> = (0..3u64)
            .map(|key| {
                let table = &table;
                s.spawn(move || table.frequency_rank(key).unwrap())
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });
    assert_eq!(ranks, vec![Some(10), Some(20), Some(30)]);
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Structured tables must decode to exactly what was encoded.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use repart::testing::{encode_frequency, encode_table};
use repart::RepartData;

#[derive(Debug, Arbitrary)]
struct Table {
    partition_count: u16,
    pass_count: u16,
    lookup: Vec<u16>,
    ranks: Vec<u32>,
    has_frequency: bool,
}

fuzz_target!(|table: Table| {
    let primary = encode_table(
        table.partition_count,
        table.pass_count,
        &table.lookup,
        table.has_frequency,
    );
    let mut ranks = table.ranks;
    ranks.resize(table.lookup.len(), 0);
    let frequency = encode_frequency(&ranks);

    let data = RepartData::from_bytes(&primary, Some(&frequency)).unwrap();
    assert_eq!(data.header().partition_count, table.partition_count);
    assert_eq!(data.header().pass_count, table.pass_count);
    assert_eq!(data.lookup(), &table.lookup[..]);
    assert_eq!(data.has_frequency(), table.has_frequency);
    if table.has_frequency {
        assert_eq!(data.frequency_order(), Some(&ranks[..]));
    } else {
        assert!(data.frequency_order().is_none());
    }
});

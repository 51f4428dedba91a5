// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Table and frequency parsing under adversarial input.
//!
//! A corrupted table on a shared filesystem should produce an error, never a
//! panic or a multi-exabyte allocation. Headers here claim any minimizer count
//! at all, and the frequency buffer is unrelated to the table.

#![no_main]

use libfuzzer_sys::fuzz_target;
use repart::RepartData;

fuzz_target!(|input: (&[u8], Option<&[u8]>)| {
    let (primary, frequency) = input;

    if let Ok(data) = RepartData::from_bytes(primary, frequency) {
        assert_eq!(data.lookup().len() as u64, data.minimizer_count());

        if let Some(order) = data.frequency_order() {
            assert!(data.has_frequency(), "frequency decoded for a table without the flag");
            assert_eq!(order.len(), data.lookup().len());
        }

        // Out-of-range keys fall back to partition 0
        assert_eq!(data.partition(data.minimizer_count()), 0);
        assert_eq!(data.partition(u64::MAX), 0);

        let sizes = data.partition_sizes();
        assert_eq!(sizes.iter().sum::<u64>(), data.minimizer_count());
    }
});

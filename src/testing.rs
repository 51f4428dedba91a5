//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It encodes table and frequency files byte-for-byte the way the upstream
//! planner writes them, so tests can build fixtures without a planner.

#![doc(hidden)]

use crate::binary::{RepartHeader, MAGIC_NUMBER};

/// Encode a primary table with a correct marker.
///
/// `minimizer_count` is taken from `lookup.len()`.
pub fn encode_table(
    partition_count: u16,
    pass_count: u16,
    lookup: &[u16],
    has_frequency: bool,
) -> Vec<u8> {
    encode_table_with_marker(partition_count, pass_count, lookup, has_frequency, MAGIC_NUMBER)
}

/// Encode a primary table ending in an arbitrary marker.
pub fn encode_table_with_marker(
    partition_count: u16,
    pass_count: u16,
    lookup: &[u16],
    has_frequency: bool,
    marker: u32,
) -> Vec<u8> {
    let header = RepartHeader {
        partition_count,
        minimizer_count: lookup.len() as u64,
        pass_count,
    };
    let mut buf = Vec::with_capacity(header.encoded_len().unwrap_or(0) as usize);
    buf.extend_from_slice(&header.partition_count.to_le_bytes());
    buf.extend_from_slice(&header.minimizer_count.to_le_bytes());
    buf.extend_from_slice(&header.pass_count.to_le_bytes());
    for entry in lookup {
        buf.extend_from_slice(&entry.to_le_bytes());
    }
    buf.push(u8::from(has_frequency));
    buf.extend_from_slice(&marker.to_le_bytes());
    buf
}

/// Encode a frequency file with a correct marker.
pub fn encode_frequency(order: &[u32]) -> Vec<u8> {
    encode_frequency_with_marker(order, MAGIC_NUMBER)
}

/// Encode a frequency file ending in an arbitrary marker.
pub fn encode_frequency_with_marker(order: &[u32], marker: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(order.len() * 4 + 4);
    for rank in order {
        buf.extend_from_slice(&rank.to_le_bytes());
    }
    buf.extend_from_slice(&marker.to_le_bytes());
    buf
}

/// Lookup table assigning minimizers to partitions round-robin.
pub fn round_robin_lookup(minimizer_count: usize, partition_count: u16) -> Vec<u16> {
    let parts = partition_count.max(1) as usize;
    (0..minimizer_count).map(|m| (m % parts) as u16).collect()
}

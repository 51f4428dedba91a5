// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format of repartition tables.
//!
//! Two files, both written once by the upstream partition planner and never
//! touched again. The primary file maps every minimizer to a partition. The
//! optional frequency file ranks minimizers by how often they were observed,
//! and only exists when the planner ran in frequency mode (the primary file's
//! flag says so).
//!
//! # Format Overview
//!
//! ```text
//! PRIMARY FILE
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (12 bytes)                                          │
//! │   partition_count: u16                                     │
//! │   minimizer_count: u64                                     │
//! │   pass_count: u16                                          │
//! ├────────────────────────────────────────────────────────────┤
//! │ LOOKUP: u16 × minimizer_count (partition id per minimizer) │
//! ├────────────────────────────────────────────────────────────┤
//! │ TRAILER (5 bytes): has_frequency: u8, marker: u32          │
//! └────────────────────────────────────────────────────────────┘
//!
//! FREQUENCY FILE
//! ┌────────────────────────────────────────────────────────────┐
//! │ ORDER: u32 × minimizer_count (rank per minimizer)          │
//! ├────────────────────────────────────────────────────────────┤
//! │ MARKER: u32 = 0x12345678                                   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! No padding, little-endian throughout. The frequency file does not repeat
//! `minimizer_count`; its length comes from the primary header.
//!
//! # Validation
//!
//! - Declared section sizes are checked against the source length before any
//!   allocation.
//! - Short reads are `Truncated` errors, never partially filled tables.
//! - Each file's trailing marker is checked independently.

mod header;
mod reader;

pub use header::{
    read_marker, write_marker, RepartHeader, RepartTrailer, FREQ_ENTRY_SIZE, FREQ_TRAILER_SIZE,
    LOOKUP_ENTRY_SIZE, MAGIC_NUMBER,
};
pub use reader::{decode_frequency_order, decode_repartition, load};

use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::{RepartError, Result};

/// Label used in errors for tables decoded from memory.
pub const MEMORY_ORIGIN: &str = "<memory>";

/// A fully decoded repartition table.
///
/// Fields are private: `lookup` always holds exactly `minimizer_count`
/// entries, and a frequency order, when present, holds the same number and
/// only exists for tables whose flag is set. Mutable access goes through
/// length-preserving slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepartData {
    header: RepartHeader,
    /// `lookup[minimizer] = partition`
    lookup: Vec<u16>,
    /// Trailer flag: the planner produced a frequency order for this table.
    has_frequency: bool,
    /// `frequency_order[minimizer] = rank`. Present only when the flag is set
    /// and a frequency file was requested.
    frequency_order: Option<Vec<u32>>,
}

impl RepartData {
    /// Assemble a table from decoded parts, checking them against `header`.
    pub fn new(
        header: RepartHeader,
        lookup: Vec<u16>,
        has_frequency: bool,
        frequency_order: Option<Vec<u32>>,
    ) -> Result<Self> {
        check_len("lookup table", header.minimizer_count, lookup.len())?;
        if let Some(order) = &frequency_order {
            let expected = if has_frequency { header.minimizer_count } else { 0 };
            check_len("frequency order", expected, order.len())?;
        }
        Ok(Self {
            header,
            lookup,
            has_frequency,
            frequency_order,
        })
    }

    /// Decode from in-memory buffers.
    ///
    /// `frequency` is only decoded when the table's flag is set, mirroring the
    /// file loader.
    pub fn from_bytes(primary: &[u8], frequency: Option<&[u8]>) -> Result<Self> {
        let origin = Path::new(MEMORY_ORIGIN);
        let mut data = decode_repartition(&mut Cursor::new(primary), primary.len() as u64, origin)?;
        if let Some(bytes) = frequency.filter(|_| data.has_frequency) {
            data.frequency_order = Some(decode_frequency_order(
                &mut Cursor::new(bytes),
                bytes.len() as u64,
                data.header.minimizer_count,
                origin,
            )?);
        }
        Ok(data)
    }

    pub fn header(&self) -> RepartHeader {
        self.header
    }

    pub fn lookup(&self) -> &[u16] {
        &self.lookup
    }

    /// Partition ids, editable in place. The length is fixed.
    pub fn lookup_mut(&mut self) -> &mut [u16] {
        &mut self.lookup
    }

    /// Whether the table file declares a frequency order.
    pub fn has_frequency(&self) -> bool {
        self.has_frequency
    }

    pub fn frequency_order(&self) -> Option<&[u32]> {
        self.frequency_order.as_deref()
    }

    /// Frequency ranks, editable in place. The length is fixed.
    pub fn frequency_order_mut(&mut self) -> Option<&mut [u32]> {
        self.frequency_order.as_deref_mut()
    }

    /// Number of minimizers in the key domain.
    #[inline]
    pub fn minimizer_count(&self) -> u64 {
        self.header.minimizer_count
    }

    /// Partition of `key`, `None` when `key` is outside the key domain.
    #[inline]
    pub fn try_partition(&self, key: u64) -> Option<u16> {
        if key >= self.header.minimizer_count {
            return None;
        }
        let idx = usize::try_from(key).ok()?;
        self.lookup.get(idx).copied()
    }

    /// Partition of `key`. Keys outside the domain map to partition 0.
    #[inline]
    pub fn partition(&self, key: u64) -> u16 {
        self.try_partition(key).unwrap_or(0)
    }

    /// Frequency rank of `key`, `None` without a frequency order or when `key`
    /// is outside the domain.
    #[inline]
    pub fn frequency_rank(&self, key: u64) -> Option<u32> {
        if key >= self.header.minimizer_count {
            return None;
        }
        let idx = usize::try_from(key).ok()?;
        self.frequency_order.as_ref()?.get(idx).copied()
    }

    /// Number of minimizers assigned to each partition id.
    ///
    /// The result covers at least `partition_count` ids. Lookup values are not
    /// validated against the header, so ids beyond it extend the histogram.
    pub fn partition_sizes(&self) -> Vec<u64> {
        let max_id = self.lookup.iter().copied().max().map_or(0, |m| m as usize + 1);
        let mut sizes = vec![0u64; max_id.max(self.header.partition_count as usize)];
        for &part in &self.lookup {
            sizes[part as usize] += 1;
        }
        sizes
    }

    /// Number of lookup entries naming a partition `>= partition_count`.
    pub fn out_of_range_entries(&self) -> usize {
        let limit = self.header.partition_count;
        self.lookup.iter().filter(|&&part| part >= limit).count()
    }

    /// Resident size of the decoded arrays in bytes.
    pub fn heap_size(&self) -> usize {
        self.lookup.len() * std::mem::size_of::<u16>()
            + self
                .frequency_order
                .as_ref()
                .map_or(0, |order| order.len() * std::mem::size_of::<u32>())
    }
}

fn check_len(section: &'static str, expected: u64, found: usize) -> Result<()> {
    if found as u64 == expected {
        return Ok(());
    }
    Err(RepartError::LengthMismatch {
        path: PathBuf::from(MEMORY_ORIGIN),
        section,
        expected,
        found: found as u64,
    })
}

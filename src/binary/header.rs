// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fixed-width header and trailer structures of the repartition files.
//!
//! The primary file opens with a 12-byte header (`partition_count`,
//! `minimizer_count`, `pass_count`) and closes with a 5-byte trailer (the
//! frequency flag and the format marker). The frequency side-file has no
//! header at all, only the 4-byte marker after its entries.
//!
//! There is no version field. The marker is an integrity guard, nothing more:
//! if it is wrong, the file was truncated, padded, or written by something
//! else entirely. Don't trust the data.
//!
//! All multi-byte fields are little-endian. The upstream writer dumps
//! host-order integers, and every platform it runs on is little-endian.

use std::io::{self, Read, Write};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Trailing marker of both the primary and the frequency file.
pub const MAGIC_NUMBER: u32 = 0x1234_5678;

/// Bytes per lookup entry (`u16` partition id)
pub const LOOKUP_ENTRY_SIZE: u64 = 2;

/// Bytes per frequency entry (`u32` rank)
pub const FREQ_ENTRY_SIZE: u64 = 4;

/// Bytes of the frequency file's trailing marker
pub const FREQ_TRAILER_SIZE: u64 = 4;

// ============================================================================
// HEADER
// ============================================================================

/// Primary file header (12 bytes, no padding)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepartHeader {
    /// Number of output partitions. Advisory; lookup values are not checked
    /// against it.
    pub partition_count: u16,
    /// Size of the dense key domain `[0, minimizer_count)`.
    pub minimizer_count: u64,
    /// Number of counting passes the partitions were planned for.
    pub pass_count: u16,
}

impl RepartHeader {
    // 2 (partition_count) + 8 (minimizer_count) + 2 (pass_count) = 12
    pub const SIZE: u64 = 12;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.partition_count.to_le_bytes())?;
        w.write_all(&self.minimizer_count.to_le_bytes())?;
        w.write_all(&self.pass_count.to_le_bytes())?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::SIZE as usize];
        r.read_exact(&mut buf)?;

        Ok(Self {
            partition_count: u16::from_le_bytes([buf[0], buf[1]]),
            minimizer_count: u64::from_le_bytes([
                buf[2], buf[3], buf[4], buf[5], buf[6], buf[7], buf[8], buf[9],
            ]),
            pass_count: u16::from_le_bytes([buf[10], buf[11]]),
        })
    }

    /// Byte length of the lookup section, `None` on overflow.
    pub fn lookup_len(&self) -> Option<u64> {
        self.minimizer_count.checked_mul(LOOKUP_ENTRY_SIZE)
    }

    /// Exact byte length of a well-formed primary file with this header.
    pub fn encoded_len(&self) -> Option<u64> {
        self.lookup_len()?
            .checked_add(Self::SIZE)?
            .checked_add(RepartTrailer::SIZE)
    }

    /// Exact byte length of the matching frequency file.
    pub fn frequency_file_len(&self) -> Option<u64> {
        self.minimizer_count
            .checked_mul(FREQ_ENTRY_SIZE)?
            .checked_add(FREQ_TRAILER_SIZE)
    }
}

// ============================================================================
// TRAILER (5 bytes)
// ============================================================================

/// Primary file trailer: frequency flag plus format marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepartTrailer {
    pub has_frequency: bool,
    pub magic: u32,
}

impl RepartTrailer {
    pub const SIZE: u64 = 5; // 1 byte flag + 4 bytes marker

    pub fn new(has_frequency: bool) -> Self {
        Self {
            has_frequency,
            magic: MAGIC_NUMBER,
        }
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[u8::from(self.has_frequency)])?;
        w.write_all(&self.magic.to_le_bytes())?;
        Ok(())
    }

    /// Read the trailer. The flag byte is a C `bool`: any nonzero value is true.
    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::SIZE as usize];
        r.read_exact(&mut buf)?;

        Ok(Self {
            has_frequency: buf[0] != 0,
            magic: u32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC_NUMBER
    }
}

/// Read the bare 4-byte marker that ends the frequency file.
pub fn read_marker<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; FREQ_TRAILER_SIZE as usize];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Write the bare 4-byte marker.
pub fn write_marker<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(&MAGIC_NUMBER.to_le_bytes())
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Streaming decoders for the primary and frequency files.
//!
//! Both decoders take the number of bytes the source holds and check the
//! sizes the header declares against it *before* allocating. A corrupted
//! `minimizer_count` of 2^60 should produce an error message, not an
//! allocation failure. Entries are decoded in fixed-size chunks so the
//! transient byte buffer stays small no matter how large the table is.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

use tracing::{debug, warn};

use super::header::{read_marker, RepartHeader, RepartTrailer, MAGIC_NUMBER};
use super::RepartData;
use crate::error::{RepartError, Result};

/// Entries decoded per `read_exact` call.
const CHUNK_ENTRIES: usize = 16 * 1024;

/// Decode a primary table from `reader`.
///
/// `available` is the byte length of the source. `origin` only labels errors.
/// The returned data never carries a frequency order; see
/// [`decode_frequency_order`].
pub fn decode_repartition<R: Read>(
    reader: &mut R,
    available: u64,
    origin: &Path,
) -> Result<RepartData> {
    if available < RepartHeader::SIZE {
        return Err(truncated(origin, "header", RepartHeader::SIZE, available));
    }
    let header = RepartHeader::read(reader)
        .map_err(|e| io_error(origin, "header", RepartHeader::SIZE, available, e))?;

    let expected = header
        .encoded_len()
        .ok_or_else(|| truncated(origin, "lookup table", u64::MAX, available))?;
    if available < expected {
        return Err(truncated(origin, "lookup table", expected, available));
    }
    let count = entry_count(header.minimizer_count, origin, expected, available)?;

    let lookup = read_le_array(reader, count, u16::from_le_bytes)
        .map_err(|e| io_error(origin, "lookup table", expected, available, e))?;

    let trailer = RepartTrailer::read(reader)
        .map_err(|e| io_error(origin, "trailer", expected, available, e))?;
    if !trailer.is_valid() {
        return Err(RepartError::BadMagic {
            path: origin.to_path_buf(),
            found: trailer.magic,
        });
    }

    if available > expected {
        warn!(
            path = %origin.display(),
            extra = available - expected,
            "ignoring trailing bytes after repartition marker"
        );
    }

    Ok(RepartData {
        header,
        lookup,
        has_frequency: trailer.has_frequency,
        frequency_order: None,
    })
}

/// Decode a frequency order of `minimizer_count` entries from `reader`.
pub fn decode_frequency_order<R: Read>(
    reader: &mut R,
    available: u64,
    minimizer_count: u64,
    origin: &Path,
) -> Result<Vec<u32>> {
    let header = RepartHeader {
        minimizer_count,
        ..RepartHeader::default()
    };
    let expected = header
        .frequency_file_len()
        .ok_or_else(|| truncated(origin, "frequency order", u64::MAX, available))?;
    if available < expected {
        return Err(truncated(origin, "frequency order", expected, available));
    }
    let count = entry_count(minimizer_count, origin, expected, available)?;

    let order = read_le_array(reader, count, u32::from_le_bytes)
        .map_err(|e| io_error(origin, "frequency order", expected, available, e))?;

    let marker =
        read_marker(reader).map_err(|e| io_error(origin, "trailer", expected, available, e))?;
    if marker != MAGIC_NUMBER {
        return Err(RepartError::BadMagic {
            path: origin.to_path_buf(),
            found: marker,
        });
    }

    if available > expected {
        warn!(
            path = %origin.display(),
            extra = available - expected,
            "ignoring trailing bytes after frequency marker"
        );
    }

    Ok(order)
}

/// Load a table from disk, plus its frequency order when both the table's
/// flag and a non-empty `frequency_path` ask for it.
///
/// A frequency path is never opened when the table's flag is unset.
pub fn load(path: &Path, frequency_path: Option<&Path>) -> Result<RepartData> {
    debug!(path = %path.display(), "loading repartition table");
    let (mut reader, len) = open(path)?;
    let mut data = decode_repartition(&mut reader, len, path)?;
    drop(reader);

    let frequency_path = frequency_path.filter(|p| !p.as_os_str().is_empty());
    match frequency_path {
        Some(freq) if data.has_frequency => {
            debug!(path = %freq.display(), "loading frequency order");
            let (mut reader, len) = open(freq)?;
            let order =
                decode_frequency_order(&mut reader, len, data.header.minimizer_count, freq)?;
            data.frequency_order = Some(order);
        }
        Some(freq) => {
            debug!(
                path = %freq.display(),
                "table has no frequency order, skipping frequency file"
            );
        }
        None if data.has_frequency => {
            debug!("table declares a frequency order but no frequency file was requested");
        }
        None => {}
    }

    debug!(
        path = %path.display(),
        partitions = data.header.partition_count,
        minimizers = data.header.minimizer_count,
        passes = data.header.pass_count,
        frequency = data.frequency_order.is_some(),
        "repartition table loaded"
    );
    Ok(data)
}

/// An opened table file. Regular files are streamed; pipes and procfs-style
/// entries report no usable length, so they are read to EOF up front.
enum Source {
    File(BufReader<File>),
    Buffered(Cursor<Vec<u8>>),
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::File(reader) => reader.read(buf),
            Source::Buffered(cursor) => cursor.read(buf),
        }
    }
}

fn open(path: &Path) -> Result<(Source, u64)> {
    let mut file = File::open(path).map_err(|source| RepartError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata = file.metadata().map_err(|source| RepartError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.is_file() {
        return Ok((Source::File(BufReader::new(file)), metadata.len()));
    }

    debug!(path = %path.display(), "not a regular file, reading to end of stream");
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|source| RepartError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let len = bytes.len() as u64;
    Ok((Source::Buffered(Cursor::new(bytes)), len))
}

fn entry_count(count: u64, origin: &Path, expected: u64, available: u64) -> Result<usize> {
    usize::try_from(count).map_err(|_| truncated(origin, "entry count", expected, available))
}

/// Read `count` little-endian fixed-width entries.
fn read_le_array<R: Read, T, const N: usize>(
    reader: &mut R,
    count: usize,
    decode: fn([u8; N]) -> T,
) -> io::Result<Vec<T>> {
    let mut out = Vec::with_capacity(count);
    let mut buf = vec![0u8; count.min(CHUNK_ENTRIES) * N];
    let mut remaining = count;

    while remaining > 0 {
        let n = remaining.min(CHUNK_ENTRIES);
        let bytes = &mut buf[..n * N];
        reader.read_exact(bytes)?;
        out.extend(bytes.chunks_exact(N).map(|chunk| {
            let mut raw = [0u8; N];
            raw.copy_from_slice(chunk);
            decode(raw)
        }));
        remaining -= n;
    }

    Ok(out)
}

fn truncated(origin: &Path, section: &'static str, expected: u64, available: u64) -> RepartError {
    RepartError::Truncated {
        path: origin.to_path_buf(),
        section,
        expected,
        available,
    }
}

fn io_error(
    origin: &Path,
    section: &'static str,
    expected: u64,
    available: u64,
    err: io::Error,
) -> RepartError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        truncated(origin, section, expected, available)
    } else {
        RepartError::Read {
            path: origin.to_path_buf(),
            source: err,
        }
    }
}

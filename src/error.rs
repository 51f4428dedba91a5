// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while loading or querying a repartition table.
//!
//! Every variant carries the path of the file that failed, so a pipeline
//! juggling dozens of tables can tell which one is broken. There is no
//! recovery path: a table either loads cleanly or the instance is unusable.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::binary::MAGIC_NUMBER;

#[derive(Debug, Error)]
pub enum RepartError {
    /// The file could not be opened or stat'ed.
    #[error("unable to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An I/O failure other than a short read.
    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file ends before the data its header declares.
    #[error(
        "unable to load {}: {section} truncated (needs {expected} bytes, {available} available)",
        path.display()
    )]
    Truncated {
        path: PathBuf,
        section: &'static str,
        expected: u64,
        available: u64,
    },

    /// Trailing format marker mismatch.
    #[error(
        "unable to load {}, possibly due to bad format (marker {found:#010x}, expected {:#010x})",
        path.display(),
        MAGIC_NUMBER
    )]
    BadMagic { path: PathBuf, found: u32 },

    /// A section's entry count disagrees with the header.
    #[error(
        "inconsistent table {}: {section} holds {found} entries, header declares {expected}",
        path.display()
    )]
    LengthMismatch {
        path: PathBuf,
        section: &'static str,
        expected: u64,
        found: u64,
    },

    /// An earlier load of this table failed; it cannot serve queries.
    #[error("repartition table {} is unusable: {reason}", path.display())]
    Unusable { path: PathBuf, reason: String },
}

impl RepartError {
    /// True for errors caused by file content rather than the filesystem.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::BadMagic { .. } | Self::Truncated { .. } | Self::LengthMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RepartError>;

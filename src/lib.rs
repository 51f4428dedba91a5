// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Minimizer-to-partition lookup for k-mer counting pipelines.
//!
//! A partition planner runs once, upstream, and writes a repartition table:
//! one partition id for every minimizer in a dense key range. Every later
//! stage that routes k-mers asks the same question millions of times per
//! second ("which partition does this minimizer go to?"). This crate loads
//! that table, checks it wasn't corrupted, and answers the question with a
//! bounds-checked array index.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │  binary/     │────▶│  table.rs        │◀────│  key.rs      │
//! │ (header,     │     │ (RepartitionTable│     │ (KeySource,  │
//! │  decoders)   │     │  lazy load, get) │     │  Minimizer)  │
//! └──────────────┘     └──────────────────┘     └──────────────┘
//!        │                      │
//!        ▼                      ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                    error.rs                          │
//! │   (RepartError: Open, Read, Truncated, BadMagic,    │
//! │    Unusable)                                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use repart::{Minimizer, RepartitionTable};
//!
//! # fn main() -> repart::Result<()> {
//! let table = RepartitionTable::with_frequency("run/repartition.bin", "run/frequency.bin");
//!
//! // First query loads and validates both files
//! let part = table.get(1234)?;
//!
//! let minimizer = Minimizer::from_ascii(b"ACGTTGCA").unwrap_or_default();
//! let same_rule = table.get_by_key(&minimizer)?;
//! # let _ = (part, same_rule);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! `RepartitionTable` is `Send + Sync`. Concurrent first queries perform a
//! single load. Call [`RepartitionTable::load`] before fanning out to keep
//! I/O errors out of worker threads.

pub mod binary;
pub mod error;
pub mod key;
pub mod table;
pub mod testing;

pub use binary::{RepartData, RepartHeader, MAGIC_NUMBER};
pub use error::{RepartError, Result};
pub use key::{KeySource, Minimizer};
pub use table::RepartitionTable;

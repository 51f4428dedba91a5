// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The repartition table: lazy-loaded, validated, queryable.
//!
//! A `RepartitionTable` is cheap to construct. It only records where its
//! files live. The first query (or an explicit [`RepartitionTable::load`])
//! reads and validates them; every later query is a bounds-checked array
//! index.
//!
//! # Lazy loading
//!
//! The decoded data sits in a `OnceLock`. The transition from unloaded to
//! loaded runs under a mutex, so when a hundred worker threads hit a fresh
//! table at once, one of them reads the files and the rest wait for it. A
//! failed load is remembered under the same mutex: the thread that triggered
//! it gets the real error, everyone after gets [`RepartError::Unusable`].
//! A broken table never answers with zeros.
//!
//! # Out-of-range keys
//!
//! `get` maps keys outside `[0, minimizer_count)` to partition 0, the same
//! answer as a legitimate partition 0. Callers that need the difference use
//! `try_get`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing::warn;

use crate::binary::{self, RepartData, RepartHeader, MEMORY_ORIGIN};
use crate::error::{RepartError, Result};
use crate::key::KeySource;

/// Batch size at which [`RepartitionTable::partitions`] fans out over rayon.
#[cfg(feature = "parallel")]
pub const PARALLEL_BATCH_THRESHOLD: usize = 1 << 16;

/// Minimizer-to-partition table backed by a repartition file.
#[derive(Debug)]
pub struct RepartitionTable {
    path: PathBuf,
    frequency_path: Option<PathBuf>,
    data: OnceLock<RepartData>,
    // Serializes the one-time load; holds the reason of a failed load.
    failure: Mutex<Option<String>>,
}

impl RepartitionTable {
    /// Lazy table without a frequency order.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frequency_path: None,
            data: OnceLock::new(),
            failure: Mutex::new(None),
        }
    }

    /// Lazy table that also loads `frequency_path` if the table declares a
    /// frequency order. An empty path means no frequency file.
    pub fn with_frequency(path: impl Into<PathBuf>, frequency_path: impl Into<PathBuf>) -> Self {
        let frequency_path = frequency_path.into();
        Self {
            frequency_path: (!frequency_path.as_os_str().is_empty()).then_some(frequency_path),
            ..Self::new(path)
        }
    }

    /// Construct and load immediately.
    pub fn open<P, F>(path: P, frequency_path: Option<F>) -> Result<Self>
    where
        P: Into<PathBuf>,
        F: Into<PathBuf>,
    {
        let table = match frequency_path {
            Some(freq) => Self::with_frequency(path, freq),
            None => Self::new(path),
        };
        table.load()?;
        Ok(table)
    }

    /// Wrap already-decoded data. The table is loaded from the start.
    ///
    /// `RepartData` can only be built through its checked constructors, so
    /// the length invariants hold here too.
    pub fn from_data(data: RepartData) -> Self {
        Self {
            data: OnceLock::from(data),
            ..Self::new(MEMORY_ORIGIN)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frequency_path(&self) -> Option<&Path> {
        self.frequency_path.as_deref()
    }

    /// True once the files were read and validated.
    pub fn is_loaded(&self) -> bool {
        self.data.get().is_some()
    }

    /// True if a previous load failed. Such a table never serves queries.
    ///
    /// Never waits: while another thread is loading, the answer is `false`.
    pub fn is_poisoned(&self) -> bool {
        !self.is_loaded()
            && self
                .failure
                .try_lock()
                .is_some_and(|failure| failure.is_some())
    }

    /// Load the table now. A no-op when already loaded.
    ///
    /// Call this before sharing the table across workers to keep I/O errors
    /// out of the query path.
    pub fn load(&self) -> Result<()> {
        self.loaded().map(|_| ())
    }

    fn loaded(&self) -> Result<&RepartData> {
        if let Some(data) = self.data.get() {
            return Ok(data);
        }

        let mut failure = self.failure.lock();
        // Another thread may have finished the load while we waited
        if let Some(data) = self.data.get() {
            return Ok(data);
        }
        if let Some(reason) = failure.as_ref() {
            return Err(RepartError::Unusable {
                path: self.path.clone(),
                reason: reason.clone(),
            });
        }

        match binary::load(&self.path, self.frequency_path.as_deref()) {
            Ok(data) => Ok(self.data.get_or_init(|| data)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "repartition table failed to load");
                *failure = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Decoded table data, loading it first if needed.
    pub fn data(&self) -> Result<&RepartData> {
        self.loaded()
    }

    /// Mutable access to the decoded data, loading it first if needed.
    ///
    /// For consumers that reorder the frequency overlay in place through
    /// [`RepartData::lookup_mut`] and [`RepartData::frequency_order_mut`].
    /// Lengths cannot change. Clones of this table are unaffected.
    pub fn data_mut(&mut self) -> Result<&mut RepartData> {
        self.load()?;
        let path = &self.path;
        self.data.get_mut().ok_or_else(|| RepartError::Unusable {
            path: path.clone(),
            reason: "table data missing after load".to_string(),
        })
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Partition of the minimizer `key`; 0 when `key >= minimizer_count`.
    #[inline]
    pub fn get(&self, key: u64) -> Result<u16> {
        Ok(self.loaded()?.partition(key))
    }

    /// Partition of the minimizer `key`, or `None` when it is out of range.
    #[inline]
    pub fn try_get(&self, key: u64) -> Result<Option<u16>> {
        Ok(self.loaded()?.try_partition(key))
    }

    /// Partition of the minimizer named by `key`; same bounds rule as
    /// [`get`](Self::get).
    #[inline]
    pub fn get_by_key<K: KeySource + ?Sized>(&self, key: &K) -> Result<u16> {
        self.get(key.minimizer_value())
    }

    /// Partitions of a batch of keys, in order.
    pub fn partitions(&self, keys: &[u64]) -> Result<Vec<u16>> {
        let data = self.loaded()?;

        #[cfg(feature = "parallel")]
        if keys.len() >= PARALLEL_BATCH_THRESHOLD {
            use rayon::prelude::*;
            return Ok(keys.par_iter().map(|&key| data.partition(key)).collect());
        }

        Ok(keys.iter().map(|&key| data.partition(key)).collect())
    }

    /// Frequency rank of `key`, `None` when no frequency order is loaded or
    /// `key` is out of range.
    pub fn frequency_rank(&self, key: u64) -> Result<Option<u32>> {
        Ok(self.loaded()?.frequency_rank(key))
    }

    // ========================================================================
    // METADATA
    // ========================================================================

    pub fn header(&self) -> Result<RepartHeader> {
        Ok(self.loaded()?.header())
    }

    pub fn partition_count(&self) -> Result<u16> {
        Ok(self.loaded()?.header().partition_count)
    }

    pub fn minimizer_count(&self) -> Result<u64> {
        Ok(self.loaded()?.minimizer_count())
    }

    pub fn pass_count(&self) -> Result<u16> {
        Ok(self.loaded()?.header().pass_count)
    }

    /// Whether the table file declares a frequency order. The order itself is
    /// only loaded when a frequency path was supplied too.
    pub fn has_frequency(&self) -> Result<bool> {
        Ok(self.loaded()?.has_frequency())
    }

    pub fn lookup(&self) -> Result<&[u16]> {
        Ok(self.loaded()?.lookup())
    }

    pub fn frequency_order(&self) -> Result<Option<&[u32]>> {
        Ok(self.loaded()?.frequency_order())
    }

    /// Minimizers per partition id.
    pub fn partition_sizes(&self) -> Result<Vec<u64>> {
        Ok(self.loaded()?.partition_sizes())
    }
}

/// Duplicates are fully independent: the lookup and frequency arrays are
/// copied element by element. An unloaded or failed table duplicates into the
/// same state.
impl Clone for RepartitionTable {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            frequency_path: self.frequency_path.clone(),
            data: self.data.clone(),
            failure: Mutex::new(self.failure.lock().clone()),
        }
    }
}

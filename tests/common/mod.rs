//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

// Re-export canonical encoders from repart::testing
pub use repart::testing::{
    encode_frequency, encode_frequency_with_marker, encode_table, encode_table_with_marker,
    round_robin_lookup,
};

// ============================================================================
// FIXTURE DIRECTORY
// ============================================================================

/// A temporary directory holding table files for one test.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write raw bytes to `name` and return its path.
    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, bytes).expect("write fixture");
        path
    }

    /// Path inside the fixture directory that is never written.
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a well-formed table file.
    pub fn table(
        &self,
        name: &str,
        partitions: u16,
        lookup: &[u16],
        has_frequency: bool,
    ) -> PathBuf {
        self.write(name, &encode_table(partitions, 1, lookup, has_frequency))
    }

    /// Write a well-formed frequency file.
    pub fn frequency(&self, name: &str, order: &[u32]) -> PathBuf {
        self.write(name, &encode_frequency(order))
    }
}

// ============================================================================
// SCENARIO FIXTURES
// ============================================================================

/// Lookup of the reference scenario: 4 partitions, 3 minimizers.
pub const SCENARIO_LOOKUP: [u16; 3] = [2, 0, 3];

/// Frequency order of the reference scenario.
pub const SCENARIO_ORDER: [u32; 3] = [10, 20, 30];

/// Scenario table without frequency data.
pub fn scenario_a(fx: &Fixture) -> PathBuf {
    fx.write("scenario_a.repart", &encode_table(4, 1, &SCENARIO_LOOKUP, false))
}

/// Scenario table with frequency data, plus its frequency file.
pub fn scenario_b(fx: &Fixture) -> (PathBuf, PathBuf) {
    let table = fx.write("scenario_b.repart", &encode_table(4, 1, &SCENARIO_LOOKUP, true));
    let freq = fx.frequency("scenario_b.freq", &SCENARIO_ORDER);
    (table, freq)
}

/// Scenario table whose marker is 0xDEADBEEF.
pub fn scenario_c(fx: &Fixture) -> PathBuf {
    fx.write(
        "scenario_c.repart",
        &encode_table_with_marker(4, 1, &SCENARIO_LOOKUP, false, 0xDEAD_BEEF),
    )
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the repart command-line interface.
//!
//! Two subcommands: `inspect` to examine a repartition table (and its
//! frequency file), and `query` to look up partitions for a handful of
//! minimizers. Both go through the library's loader, so they validate exactly
//! what a pipeline stage would.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "repart",
    about = "Inspect and query minimizer repartition tables",
    version
)]
pub struct Cli {
    /// Show debug logs (honours RUST_LOG when set)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all logs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show header, sizes, partition histogram, and checksums of a table
    Inspect {
        /// Path to the repartition table
        table: PathBuf,

        /// Path to the frequency order file
        #[arg(short, long)]
        freq: Option<PathBuf>,

        /// Emit a JSON report instead of the box diagram
        #[arg(long)]
        json: bool,
    },

    /// Look up the partition of each key
    Query {
        /// Path to the repartition table
        table: PathBuf,

        /// Path to the frequency order file (adds a rank column)
        #[arg(short, long)]
        freq: Option<PathBuf>,

        /// Keys: decimal, 0x-prefixed hex, or an ACGT minimizer sequence
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

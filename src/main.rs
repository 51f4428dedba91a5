// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use repart::{KeySource, Minimizer, RepartitionTable, MAGIC_NUMBER};

mod cli;
use cli::display::{self, palette};
use cli::{Cli, Commands};

/// Partitions listed one per row before the histogram is summarized.
const MAX_HISTOGRAM_ROWS: usize = 32;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);
    if cli.no_color {
        display::disable_colors();
    }

    let result = match cli.command {
        Commands::Inspect { table, freq, json } => inspect(&table, freq, json),
        Commands::Query { table, freq, keys } => query(&table, freq, &keys),
    };

    if let Err(e) = result {
        eprintln!(
            "{} {:#}",
            display::themed(palette::RED, &[display::BOLD], "error:"),
            e
        );
        std::process::exit(1);
    }
}

/// Logs go to stderr so `query` output stays pipeable.
///
///   --quiet   → nothing
///   --verbose → RUST_LOG if set, otherwise debug
///   default   → warnings only
fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// INSPECT
// ============================================================================

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    size: u64,
    crc32: String,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    table: FileReport,
    frequency: Option<FileReport>,
    marker: String,
    partition_count: u16,
    minimizer_count: u64,
    pass_count: u16,
    has_frequency: bool,
    frequency_loaded: bool,
    memory_bytes: usize,
    out_of_range_entries: usize,
    partition_sizes: Vec<u64>,
}

fn inspect(path: &Path, freq: Option<PathBuf>, json: bool) -> Result<()> {
    let report = build_report(path, freq.as_deref())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn build_report(path: &Path, freq: Option<&Path>) -> Result<InspectReport> {
    let table = RepartitionTable::open(path, freq)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let data = table.data()?;
    let header = data.header();

    let frequency = match (freq, data.frequency_order().is_some()) {
        (Some(freq_path), true) => Some(file_report(freq_path)?),
        _ => None,
    };

    // Loading succeeded, so every marker read matched
    Ok(InspectReport {
        table: file_report(path)?,
        frequency,
        marker: format!("{:#010x}", MAGIC_NUMBER),
        partition_count: header.partition_count,
        minimizer_count: header.minimizer_count,
        pass_count: header.pass_count,
        has_frequency: data.has_frequency(),
        frequency_loaded: data.frequency_order().is_some(),
        memory_bytes: data.heap_size(),
        out_of_range_entries: data.out_of_range_entries(),
        partition_sizes: data.partition_sizes(),
    })
}

fn file_report(path: &Path) -> Result<FileReport> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = vec![0u8; 64 * 1024];
    let mut size = 0u64;

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }

    Ok(FileReport {
        path: path.display().to_string(),
        size,
        crc32: format!("{:08x}", hasher.finalize()),
    })
}

fn print_report(report: &InspectReport) {
    display::section_top("TABLE");
    display::field("path", &report.table.path);
    display::field(
        "size",
        &format!("{} ({} bytes)", display::format_size(report.table.size), report.table.size),
    );
    display::field("crc32", &report.table.crc32);
    display::field(
        "marker",
        &format!(
            "{} {}",
            report.marker,
            display::themed(palette::GREEN, &[display::BOLD], "verified")
        ),
    );
    display::field("partitions", &report.partition_count.to_string());
    display::field("minimizers", &report.minimizer_count.to_string());
    display::field("passes", &report.pass_count.to_string());
    display::field("memory", &display::format_size(report.memory_bytes as u64));
    if report.out_of_range_entries > 0 {
        display::field(
            "out-of-range ids",
            &display::warning(&format!(
                "{} entries >= partition count",
                report.out_of_range_entries
            )),
        );
    }
    display::section_bot();

    display::section_top("FREQUENCY ORDER");
    let status = match (report.has_frequency, &report.frequency) {
        (false, _) => "not produced by planner".to_string(),
        (true, Some(freq)) => format!("loaded ({}, crc32 {})", freq.path, freq.crc32),
        (true, None) => display::warning("declared, no frequency file given"),
    };
    display::field("status", &status);
    display::section_bot();

    display::section_top("PARTITIONS");
    print_histogram(&report.partition_sizes);
    display::section_bot();
}

fn print_histogram(sizes: &[u64]) {
    let max = sizes.iter().copied().max().unwrap_or(0);

    if sizes.len() <= MAX_HISTOGRAM_ROWS {
        for (part, &size) in sizes.iter().enumerate() {
            display::row(&format!(
                " {:>5}  {:>12}  {}",
                part,
                size,
                display::themed(palette::GREEN, &[], &display::bar(size, max, 40))
            ));
        }
        return;
    }

    let min = sizes.iter().copied().min().unwrap_or(0);
    let total: u64 = sizes.iter().sum();
    let mean = total as f64 / sizes.len() as f64;
    let empty = sizes.iter().filter(|&&s| s == 0).count();
    display::field("partition ids", &sizes.len().to_string());
    display::field("smallest", &min.to_string());
    display::field("largest", &max.to_string());
    display::field("mean", &format!("{:.1}", mean));
    display::field("empty", &empty.to_string());
}

// ============================================================================
// QUERY
// ============================================================================

fn query(path: &Path, freq: Option<PathBuf>, keys: &[String]) -> Result<()> {
    let parsed = keys
        .iter()
        .map(|raw| parse_key(raw))
        .collect::<Result<Vec<u64>>>()?;

    let table = RepartitionTable::open(path, freq.as_ref())
        .with_context(|| format!("failed to load {}", path.display()))?;
    let with_rank = table.frequency_order()?.is_some();

    for (raw, key) in keys.iter().zip(parsed) {
        let rank = if with_rank {
            Some(table.frequency_rank(key)?)
        } else {
            None
        };
        println!("{}", query_line(raw, table.try_get(key)?, rank));
    }
    Ok(())
}

/// `key\tpartition`, plus `\trank` when a frequency order is loaded.
/// Out-of-range values print as `-`.
fn query_line(raw: &str, partition: Option<u16>, rank: Option<Option<u32>>) -> String {
    fn cell<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| "-".to_string(), |v| v.to_string())
    }

    match rank {
        Some(rank) => format!("{}\t{}\t{}", raw, cell(partition), cell(rank)),
        None => format!("{}\t{}", raw, cell(partition)),
    }
}

/// Decimal, `0x` hex, or an ACGT minimizer sequence.
fn parse_key(raw: &str) -> Result<u64> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).with_context(|| format!("invalid hex key '{raw}'"));
    }
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }
    Minimizer::from_ascii(raw.as_bytes())
        .map(|m| m.minimizer_value())
        .with_context(|| format!("invalid key '{raw}': not a number or ACGT sequence"))
}

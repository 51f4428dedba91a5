//! Custom cargo commands for the repart crate.
//!
//! Usage:
//!   cargo xtask check     - cargo check + test + clippy
//!   cargo xtask test      - Run all tests (default and no-default features)
//!   cargo xtask fuzz      - Run each fuzz target for a short time
//!   cargo xtask bench     - Run benchmarks

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Seconds each fuzz target runs under `cargo xtask fuzz`.
const FUZZ_SECONDS: u32 = 60;

const FUZZ_TARGETS: &[&str] = &["table_parsing", "table_encoding"];

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("check") => check()?,
        Some("test") => test()?,
        Some("fuzz") => fuzz()?,
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  check     Quick check (cargo check + test + clippy)
  test      Run all Rust tests, with and without default features
  fuzz      Run every fuzz target for {FUZZ_SECONDS}s (needs cargo-fuzz, nightly)
  bench     Run benchmarks
"#
    );
}

fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check", "--all-targets"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// The library must also work without rayon and the CLI stack.
fn test() -> Result<()> {
    run_cargo(&["test"])?;
    run_cargo(&["test", "--lib", "--no-default-features"])
}

fn fuzz() -> Result<()> {
    let fuzz_dir = project_root()?.join("fuzz");
    let max_time = format!("-max_total_time={FUZZ_SECONDS}");

    for target in FUZZ_TARGETS {
        println!("fuzzing {target} for {FUZZ_SECONDS}s...");
        let status = Command::new("cargo")
            .args(["+nightly", "fuzz", "run", target, "--", &max_time])
            .current_dir(&fuzz_dir)
            .status()
            .context("Failed to run cargo fuzz (is cargo-fuzz installed?)")?;

        if !status.success() {
            bail!("fuzz target {target} failed");
        }
    }

    println!("\n✓ No crashes");
    Ok(())
}

fn bench() -> Result<()> {
    run_cargo(&["bench", "--bench", "lookup_bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("Failed to read current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}

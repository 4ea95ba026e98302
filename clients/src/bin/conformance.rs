//! `bokuteki-conformance`: verifies decorated pages.
//!
//! Checks theorem numbering, proof and case structure, and that no marked
//! block was left undecorated.
//!
//! **Usage:**
//! ```
//! bokuteki-conformance [--artifacts <path>] [--config <file>]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use bokuteki_clients::init_tracing;
use bokuteki_conformance::{run_all, Severity};
use bokuteki_decorator::DecoratorConfig;
use clap::Parser;

/// Verify decorated pages.
#[derive(Parser)]
#[command(
    name = "bokuteki-conformance",
    about = "Verify theorem numbering and proof/case structure of decorated pages"
)]
struct Args {
    /// Directory of decorated pages (default: public/).
    #[arg(long, default_value = "public")]
    artifacts: PathBuf,

    /// TOML configuration file used when decorating.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(false);

    let config = match &args.config {
        Some(path) => DecoratorConfig::load(path)?,
        None => DecoratorConfig::default(),
    };
    let report = run_all(&args.artifacts, &config.markers)?;

    println!("bokuteki Conformance Report");
    println!("===========================");
    println!();

    for result in &report.results {
        println!("[{}] {} — {}", result.severity.tag(), result.check, result.message);
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let failed = report.count(Severity::Failure);
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        report.count(Severity::Pass),
        report.count(Severity::Warning),
        failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}

//! bokuteki conformance suite.
//!
//! Verifies a directory of decorated pages. Every check runs over all
//! `.html` files found under the artifacts directory.
//!
//! | Check | Requirement |
//! |-------|-------------|
//! | `decorated/theorems` | headers read `(定理 k)` with k = 1..N per page |
//! | `decorated/proofs` | one `(証明)` label, content ending in `□` |
//! | `decorated/cases` | one `li.case` carrying a condition phrase |
//! | `decorated/leftovers` | no marked block lacks the decorated stamp |
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//! use bokuteki_conformance::run_all;
//! use bokuteki_decorator::Markers;
//!
//! let report = run_all(Path::new("public"), &Markers::default()).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod pages;
pub mod report;
pub mod validators;

use std::path::Path;

use anyhow::Result;
use bokuteki_decorator::Markers;

pub use report::{CheckResult, ConformanceReport, Severity};

use validators::decorated::{cases, leftovers, proofs, theorems};

/// Runs every check over the pages under `artifacts`.
///
/// A missing directory or one without pages yields a single warning.
///
/// # Errors
///
/// Returns an error only if a page cannot be read.
pub fn run_all(artifacts: &Path, markers: &Markers) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::default();

    if !artifacts.exists() {
        report.push(CheckResult::warn(
            "decorated",
            format!("Artifacts directory not found: {}", artifacts.display()),
        ));
        return Ok(report);
    }

    let pages = pages::load_pages(artifacts)?;
    if pages.is_empty() {
        report.push(CheckResult::warn(
            "decorated",
            "No HTML pages found in artifacts directory",
        ));
        return Ok(report);
    }

    report.push(theorems::validate(&pages)?);
    report.push(proofs::validate(&pages, markers));
    report.push(cases::validate(&pages, markers));
    report.push(leftovers::validate(&pages, markers));

    Ok(report)
}

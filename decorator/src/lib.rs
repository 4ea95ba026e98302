//! bokuteki page decorator.
//!
//! Post-processes the rendered HTML of a math blog page: typesets math between
//! `$..$`, `$$..$$`, `\(..\)` and `\[..\]`, numbers theorem blocks, wraps proof
//! blocks with a collapsible label, and renders case-analysis branches as list
//! items.
//!
//! # Entry Point
//!
//! ```no_run
//! use bokuteki_decorator::{decorate_html, DecoratorConfig, KatexCli};
//!
//! let html = r#"<div class="math-theorem" data-title="Fermat">$a^n + b^n = c^n$</div>"#;
//! let (out, report) = decorate_html(html, &DecoratorConfig::default(), &KatexCli::default())
//!     .expect("decoration failed");
//! assert_eq!(report.theorems, 1);
//! assert!(out.contains("(定理 1) Fermat"));
//! ```
//!
//! # Input markup
//!
//! ```text
//! <div class="math-theorem" data-title="..">statement</div>
//! <div class="math-proof">argument</div>
//! <div class="math-case" data-rule="base">branch</div>
//! <div class="math-case otherwise">catch-all branch</div>
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod case;
pub mod config;
pub mod dom;
pub mod error;
pub mod model;
pub mod page;
pub mod proof;
pub mod script;
pub mod theorem;
pub mod typeset;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

pub use config::{DecoratorConfig, Markers};
pub use error::{ConfigError, DecorateError, TypesetError};
pub use model::{CaseCondition, DecorationReport, ProofState};
pub use page::Page;
pub use proof::ProofLabel;
pub use typeset::{Delimiter, KatexCli, MathRenderer, SkipMath, TypesetConfig};

/// Decorates one HTML document and returns the serialized result.
///
/// # Errors
///
/// Returns an error if the document has no body, typesetting fails, or the
/// result cannot be serialized.
pub fn decorate_html(
    html: &str,
    config: &DecoratorConfig,
    renderer: &dyn MathRenderer,
) -> std::result::Result<(String, DecorationReport), DecorateError> {
    let mut page = Page::parse(html);
    let report = page.decorate(config, renderer)?;
    Ok((page.to_html()?, report))
}

/// Decorates the page at `input` and writes it to `output`.
///
/// `input` and `output` may be the same path.
///
/// # Errors
///
/// Returns an error if the input cannot be read, decoration fails, or the
/// output cannot be written.
pub fn decorate_file(
    input: &Path,
    output: &Path,
    config: &DecoratorConfig,
    renderer: &dyn MathRenderer,
) -> Result<DecorationReport> {
    let html = fs::read_to_string(input)
        .with_context(|| format!("Cannot read page: {}", input.display()))?;
    let (decorated, report) = decorate_html(&html, config, renderer)
        .with_context(|| format!("Cannot decorate page: {}", input.display()))?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory: {}", parent.display()))?;
    }
    fs::write(output, decorated)
        .with_context(|| format!("Cannot write page: {}", output.display()))?;
    debug!(input = %input.display(), output = %output.display(), "wrote page");
    Ok(report)
}

/// Decorates every `.html` file under `input_dir`, mirroring the directory
/// layout under `out_dir`. Pages are processed in sorted path order.
///
/// # Errors
///
/// Returns an error on the first page that cannot be read, decorated, or written.
pub fn decorate_dir(
    input_dir: &Path,
    out_dir: &Path,
    config: &DecoratorConfig,
    renderer: &dyn MathRenderer,
) -> Result<DecorationReport> {
    let mut total = DecorationReport::default();

    for entry in WalkDir::new(input_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map(|x| x == "html").unwrap_or(false))
    {
        let path = entry.path();
        let rel_path = path.strip_prefix(input_dir).unwrap_or(path);
        let report = decorate_file(path, &out_dir.join(rel_path), config, renderer)?;
        total.merge(&report);
    }

    info!(
        pages = total.pages,
        theorems = total.theorems,
        proofs = total.proofs,
        cases = total.cases,
        "decorated directory {}",
        input_dir.display()
    );
    Ok(total)
}

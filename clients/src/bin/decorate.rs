//! `bokuteki-decorate`: decorates rendered math blog pages.
//!
//! Numbers theorem blocks, wraps proofs with a collapsible label, formats
//! case branches, and typesets math with KaTeX.
//!
//! **Usage:**
//! ```
//! bokuteki-decorate <INPUT> [--out <path>] [--config <file>] [--typesetter katex|none]
//!                   [--katex-command <cmd>] [--no-script] [--json] [--verbose]
//! ```
//!
//! `INPUT` may be a single page or a directory; directories are mirrored
//! into `--out`. Without `--out` pages are decorated in place.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{bail, Result};
use bokuteki_clients::init_tracing;
use bokuteki_decorator::{
    decorate_dir, decorate_file, DecoratorConfig, KatexCli, MathRenderer, SkipMath,
};
use clap::{Parser, ValueEnum};

/// How math between delimiters is handled.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Typesetter {
    /// Render each expression with the KaTeX command line tool.
    Katex,
    /// Leave math source in place for client-side rendering.
    #[value(name = "none")]
    Skip,
}

/// Decorate rendered math blog pages.
#[derive(Parser)]
#[command(
    name = "bokuteki-decorate",
    about = "Number theorems, wrap proofs and cases, and typeset math in rendered HTML"
)]
struct Args {
    /// Page or directory of pages to decorate.
    input: PathBuf,

    /// Output file or directory (default: decorate in place).
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Math typesetting backend.
    #[arg(long, value_enum, default_value_t = Typesetter::Katex)]
    typesetter: Typesetter,

    /// Command line used to invoke KaTeX.
    #[arg(long, default_value = "npx katex")]
    katex_command: String,

    /// Do not append the proof toggle script.
    #[arg(long)]
    no_script: bool,

    /// Print the decoration report as JSON.
    #[arg(long)]
    json: bool,

    /// Log every decorated block.
    #[arg(long, short)]
    verbose: bool,
}

fn renderer(args: &Args) -> Result<Box<dyn MathRenderer>> {
    match args.typesetter {
        Typesetter::Skip => Ok(Box::new(SkipMath)),
        Typesetter::Katex => {
            let mut words = args.katex_command.split_whitespace().map(str::to_string);
            let Some(program) = words.next() else {
                bail!("--katex-command is empty");
            };
            Ok(Box::new(KatexCli::new(program, words.collect())))
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => DecoratorConfig::load(path)?,
        None => DecoratorConfig::default(),
    };
    if args.no_script {
        config.inject_toggle_script = false;
    }
    let renderer = renderer(&args)?;
    let out = args.out.clone().unwrap_or_else(|| args.input.clone());

    let report = if args.input.is_dir() {
        decorate_dir(&args.input, &out, &config, renderer.as_ref())?
    } else {
        decorate_file(&args.input, &out, &config, renderer.as_ref())?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Pages decorated.");
    println!("  Output:   {}", out.display());
    println!("  Pages:    {}", report.pages);
    println!("  Theorems: {}", report.theorems);
    println!("  Proofs:   {}", report.proofs);
    println!("  Cases:    {}", report.cases);
    println!("  Math:     {}", report.math_expressions);
    if report.skipped > 0 {
        println!("  Skipped:  {} (already decorated)", report.skipped);
    }

    Ok(())
}

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod logging;

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use sable_syntax::{Diagnostic, Diagnostics, SourceFile};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "sable")]
#[command(author, version, about = "Check sable source files for syntax errors", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit one JSON report per file on stdout (stable, machine-readable)
    #[arg(long)]
    json: bool,

    /// Lines of source shown above and below each error
    #[arg(long, value_name = "N", env = "SABLE_CONTEXT", default_value_t = 1)]
    context: usize,

    /// Never color diagnostics
    #[arg(long)]
    no_color: bool,

    /// Source files to check
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

/// JSON report for one file.
#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a str,
    /// No diagnostics and the parse ran to the end.
    ok: bool,
    /// Nodes in the tree; absent when the parse stopped on a fatal error.
    nodes: Option<usize>,
    diagnostics: Vec<DiagnosticReport>,
    /// Plain-text rendering, exactly as human mode would print it.
    rendered: String,
}

#[derive(Serialize)]
struct DiagnosticReport {
    row: usize,
    column: usize,
    length: usize,
    message: String,
}

impl From<&Diagnostic> for DiagnosticReport {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            row: diagnostic.row,
            column: diagnostic.column,
            length: diagnostic.length,
            message: diagnostic.message.to_string(),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::default()
        .with_verbosity(cli.verbose)
        .with_json(cli.json)
        .with_context_lines(cli.context)
        .with_color(!cli.no_color && io::stdout().is_terminal());

    logging::init(config.verbosity, config.json);
    debug!(?config, files = cli.files.len(), "starting");

    let mut clean = true;
    for path in &cli.files {
        let span = tracing::info_span!("check", file = %path.display());
        let _guard = span.enter();
        clean &= check_file(path, &config)?;
    }

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Parse one file and print its diagnostics. Returns whether it was clean.
fn check_file(path: &Path, config: &Config) -> Result<bool> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let name = path.display().to_string();

    let file = SourceFile::new(&name, &content);
    let diagnostics = if config.json {
        Diagnostics::buffered(file, config.diagnostics())
    } else {
        Diagnostics::new(file, config.diagnostics())
    };

    let nodes = match sable_syntax::parse(file, &diagnostics) {
        Ok(ast) => Some(ast.len()),
        // Already rendered by the diagnostics context.
        Err(err) if err.is_fatal_diagnostic() => None,
        Err(err) => {
            return Err(err)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to check {name}"));
        }
    };
    diagnostics
        .finalize()
        .into_diagnostic()
        .wrap_err("failed to print diagnostics")?;

    let records = diagnostics.records();
    let ok = nodes.is_some() && records.is_empty();

    if config.json {
        let report = FileReport {
            file: &name,
            ok,
            nodes,
            diagnostics: records.iter().map(DiagnosticReport::from).collect(),
            rendered: diagnostics.take_output(),
        };
        println!("{}", serde_json::to_string(&report).into_diagnostic()?);
    } else if ok {
        info!(nodes = nodes.unwrap_or_default(), "ok");
    } else {
        info!(errors = records.len(), fatal = nodes.is_none(), "failed");
    }

    Ok(ok)
}

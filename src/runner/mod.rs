//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the modules file named by the [`Cli`] and renders it according to
//! the selected command.

mod error;

pub use error::RunnerError;

use crate::cli::{Cli, Commands, EmitArgs};
use crate::diagnostics::ResultExt;
use crate::graph::Graph;
use crate::hasher::GraphHasher;
use crate::{manifest, render};
use camino::{Utf8Path, Utf8PathBuf};
use miette::Result;
use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use tracing::{debug, info, warn};

/// Execute the parsed [`Cli`] commands, writing results to stdout.
///
/// # Errors
///
/// Returns an error if the modules file cannot be loaded or the output
/// cannot be written.
pub fn run(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out)
}

/// Execute the parsed [`Cli`] commands, writing results to `out`.
///
/// Files requested with `--emit` are written directly; everything else goes
/// to `out`.
///
/// # Errors
///
/// Returns an error if the modules file cannot be loaded or the output
/// cannot be written.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let path = resolve_modules_path(cli)?;
    ensure_modules_file_exists(cli, &path)?;
    debug!(path = %path, "loading modules file");
    let graph = manifest::from_path(&path)?;

    match cli.command.clone().unwrap_or(Commands::Check) {
        Commands::Check => handle_check(&graph, out),
        Commands::Graph(EmitArgs { emit }) => {
            let dot = render::dot(&graph);
            emit_or_print(cli, emit.as_deref(), &dot, out)
        }
        Commands::Json {
            output: EmitArgs { emit },
            pretty,
        } => {
            let json = render::json(&graph, pretty).diag("serialise module graph")?;
            emit_or_print(cli, emit.as_deref(), &format!("{json}\n"), out)
        }
    }
}

/// Print the summary, warn about cycles and print the fingerprint.
fn handle_check(graph: &Graph, out: &mut dyn Write) -> Result<()> {
    if let Some(cycle) = graph.find_cycle() {
        warn!(cycle = %cycle.join(" -> "), "module graph contains a cycle");
    }
    write!(out, "{}", render::summary(graph)).diag("write summary")?;
    writeln!(out, "fingerprint: {}", GraphHasher::hash(graph)).diag("write fingerprint")?;
    Ok(())
}

fn emit_or_print(
    cli: &Cli,
    emit: Option<&Utf8Path>,
    content: &str,
    out: &mut dyn Write,
) -> Result<()> {
    match emit {
        Some(path) => {
            let path = resolve_output_path(cli, path);
            fs::write(path.as_std_path(), content).diag_with(|| format!("write {path}"))?;
            info!(path = %path, bytes = content.len(), "wrote output");
            Ok(())
        }
        None => out.write_all(content.as_bytes()).diag("write output"),
    }
}

/// Determine the modules file path respecting the CLI's directory option.
fn resolve_modules_path(cli: &Cli) -> Result<Utf8PathBuf> {
    let resolved = match &cli.directory {
        Some(dir) => dir.join(&cli.file),
        None => cli.file.clone(),
    };
    if resolved.file_name().is_none() {
        return Err(RunnerError::MissingFileName { path: resolved }.into());
    }
    Ok(resolved)
}

/// Resolve an output path relative to the CLI working directory.
fn resolve_output_path<'a>(cli: &Cli, path: &'a Utf8Path) -> Cow<'a, Utf8Path> {
    if path.is_relative() {
        cli.directory
            .as_ref()
            .map_or_else(|| Cow::Borrowed(path), |dir| Cow::Owned(dir.join(path)))
    } else {
        Cow::Borrowed(path)
    }
}

fn ensure_modules_file_exists(cli: &Cli, path: &Utf8Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| RunnerError::MissingFileName {
            path: path.to_owned(),
        })?
        .to_owned();
    let directory = if cli.directory.is_some() {
        let parent = path.parent().map_or_else(|| path.as_str(), Utf8Path::as_str);
        format!("directory `{parent}`")
    } else {
        "the current directory".to_owned()
    };
    Err(RunnerError::ModulesFileNotFound {
        file_name,
        directory,
        path: path.to_owned(),
    }
    .into())
}

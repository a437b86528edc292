//! Error types for the runner module.
//!
//! This submodule isolates derive-macro-affected code to scope lint
//! suppressions narrowly.

// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised during command execution.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The modules file does not exist at the expected path.
    #[error("no `{file_name}` found in {directory}")]
    #[diagnostic(
        code(modgraph::runner::modules_file_not_found),
        help("pass --file to name a modules file or -C to change directory")
    )]
    ModulesFileNotFound {
        /// Name of the expected file, such as `modules.txt`.
        file_name: String,
        /// Description of the directory that was searched.
        directory: String,
        /// The path that was attempted.
        path: Utf8PathBuf,
    },

    /// The `--file` path has no file name component.
    #[error("modules file path `{path}` does not name a file")]
    #[diagnostic(code(modgraph::runner::missing_file_name))]
    MissingFileName {
        /// The path that was given.
        path: Utf8PathBuf,
    },
}

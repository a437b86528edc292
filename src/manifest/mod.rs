//! Modules file loading helpers.
//!
//! Reads a `modules.txt` file, parses it into declarations and feeds them to
//! [`GraphBuilder`]. Any failure aborts the read; the returned error carries
//! a diagnostic rendered against the file contents.

use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use std::fs;
use thiserror::Error;
use tracing::debug;

use crate::graph::{Graph, GraphBuilder};
use crate::parser;

mod diagnostics;

pub use diagnostics::{ManifestName, ManifestSource, map_build_error, map_parse_error};

/// Default file name of a modules file.
pub const DEFAULT_FILE_NAME: &str = "modules.txt";

/// Error raised when a modules file cannot be turned into a graph.
///
/// # Examples
/// ```rust
/// use modgraph::manifest::{self, ManifestError};
///
/// let err = manifest::from_str("a\na\n").expect_err("duplicate");
/// assert!(matches!(err, ManifestError::Build { .. }));
/// assert_eq!(err.to_string(), "invalid module graph");
/// ```
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    #[diagnostic(code(modgraph::manifest::read))]
    Read {
        /// Path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The text does not follow the modules file syntax.
    #[error("modules file parse error")]
    #[diagnostic(code(modgraph::manifest::parse))]
    Parse {
        /// Diagnostic pointing at the offending text.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },

    /// The declarations do not form a valid graph.
    #[error("invalid module graph")]
    #[diagnostic(code(modgraph::manifest::build))]
    Build {
        /// Diagnostic pointing at the offending declaration.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },
}

/// Parse and build a graph from text, using `name` for the graph name and
/// diagnostics.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] or [`ManifestError::Build`].
pub fn from_str_named(text: &str, name: &str) -> Result<Graph, ManifestError> {
    let src = ManifestSource::from(text);
    let name = ManifestName::from(name);

    let decls = parser::parse(src.as_str()).map_err(|err| ManifestError::Parse {
        source: map_parse_error(err, &src, &name),
    })?;
    debug!(file = %name, declarations = decls.len(), "parsed modules file");

    let graph = GraphBuilder::build(name.as_str(), &decls).map_err(|err| ManifestError::Build {
        source: map_build_error(err, &src, &name),
    })?;
    debug!(
        file = %name,
        modules = graph.module_count(),
        dependencies = graph.dependencies().len(),
        "built module graph"
    );
    Ok(graph)
}

/// Parse and build a graph from text named [`DEFAULT_FILE_NAME`].
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] or [`ManifestError::Build`].
pub fn from_str(text: &str) -> Result<Graph, ManifestError> {
    from_str_named(text, DEFAULT_FILE_NAME)
}

/// Load a graph from a modules file on disk.
///
/// The graph is named after the file's display path.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] when the file cannot be read, otherwise
/// the errors of [`from_str_named`].
pub fn from_path(path: &Utf8Path) -> Result<Graph, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_owned(),
        source,
    })?;
    from_str_named(&text, path.as_str())
}

//! Attaches source text to parse and build errors.
//!
//! [`ParseError`] and [`BuildError`] only carry byte spans. The loader knows
//! the file name and contents, so it wraps them in a diagnostic that renders
//! the offending line with a label under the span.

use std::fmt::{self, Display};

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use thiserror::Error;

use crate::graph::BuildError;
use crate::parser::ParseError;

/// Text content of a modules file.
///
/// # Examples
/// ```rust
/// use modgraph::manifest::ManifestSource;
/// let source = ManifestSource::from("core [common]");
/// assert_eq!(source.as_str(), "core [common]");
/// ```
#[derive(Debug, Clone)]
pub struct ManifestSource(String);

impl ManifestSource {
    /// Wrap source text.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    /// Borrow the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ManifestSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ManifestSource {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for ManifestSource {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Display name of a modules file, used as the graph name and in
/// diagnostics.
///
/// # Examples
/// ```rust
/// use modgraph::manifest::ManifestName;
/// let name = ManifestName::new("modules.txt");
/// assert_eq!(name.to_string(), "modules.txt");
/// ```
#[derive(Debug, Clone)]
pub struct ManifestName(String);

impl ManifestName {
    /// Wrap a display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ManifestName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for ManifestName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ManifestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An inner error re-rendered against its source text.
#[derive(Debug, Error)]
#[error("{message}")]
struct SourcedDiagnostic {
    src: NamedSource<String>,
    span: Option<SourceSpan>,
    label: &'static str,
    code: Option<String>,
    help: Option<String>,
    message: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Diagnostic for SourcedDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn Display + 'a>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.label.to_owned()),
            span,
        ))))
    }
}

fn line_column(src: &ManifestSource, offset: usize) -> (usize, usize) {
    let before = src.as_str().get(..offset).unwrap_or_else(|| src.as_str());
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    (line, column)
}

fn sourced<E>(
    err: E,
    span: Option<SourceSpan>,
    label: &'static str,
    src: &ManifestSource,
    name: &ManifestName,
) -> Box<dyn Diagnostic + Send + Sync + 'static>
where
    E: Diagnostic + Send + Sync + 'static,
{
    let message = span.map_or_else(
        || format!("{name}: {err}"),
        |at| {
            let (line, column) = line_column(src, at.offset());
            format!("{name}:{line}:{column}: {err}")
        },
    );
    Box::new(SourcedDiagnostic {
        src: NamedSource::new(name.as_str(), src.as_str().to_owned()),
        span,
        label,
        code: err.code().map(|code| code.to_string()),
        help: err.help().map(|help| help.to_string()),
        message,
        source: Box::new(err),
    })
}

/// Render a syntax error against its source.
#[must_use]
pub fn map_parse_error(
    err: ParseError,
    src: &ManifestSource,
    name: &ManifestName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let span = err.span();
    let label = err.label();
    sourced(err, Some(span), label, src, name)
}

/// Render a graph validation error against its source.
#[must_use]
pub fn map_build_error(
    err: BuildError,
    src: &ManifestSource,
    name: &ManifestName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let span = err.span();
    let label = err.label();
    sourced(err, span, label, src, name)
}

//! Syntax errors for the `modules.txt` format.

// See graph/error.rs: derive expansion trips `unused_assignments`.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A lexical or structural error in a modules file.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    /// A character that cannot start any token.
    #[error("unexpected character `{found}`")]
    #[diagnostic(
        code(modgraph::syntax::unexpected_character),
        help("names may contain letters, digits, `_`, `.`, `$` and `-`")
    )]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
        /// Its location.
        span: SourceSpan,
    },

    /// A quoted value without its closing quote.
    #[error("unterminated string")]
    #[diagnostic(code(modgraph::syntax::unterminated_string))]
    UnterminatedString {
        /// From the opening quote to the end of the line.
        span: SourceSpan,
    },

    /// A token that does not fit the grammar at this point.
    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(modgraph::syntax::unexpected_token))]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: &'static str,
        /// Description of what it saw.
        found: String,
        /// Location of the token.
        span: SourceSpan,
    },

    /// An attribute list still open at the end of the line.
    #[error("attribute list is not closed")]
    #[diagnostic(
        code(modgraph::syntax::unclosed_attributes),
        help("attribute lists must close with `]` on the same line")
    )]
    UnclosedAttributes {
        /// Location of the opening bracket.
        span: SourceSpan,
    },
}

impl ParseError {
    /// Location of the error in the source text.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::UnexpectedCharacter { span, .. }
            | Self::UnterminatedString { span }
            | Self::UnexpectedToken { span, .. }
            | Self::UnclosedAttributes { span } => *span,
        }
    }

    /// Short label describing what the span points at.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UnexpectedCharacter { .. } => "not valid here",
            Self::UnterminatedString { .. } => "string starts here",
            Self::UnexpectedToken { .. } => "unexpected token",
            Self::UnclosedAttributes { .. } => "opened here",
        }
    }
}

//! Errors raised while assembling a [`Graph`](super::Graph).
//!
//! Every variant is fatal: the builder stops at the first failure and no
//! partial graph is produced.

// miette/thiserror derive expansion trips `unused_assignments` on some
// toolchains; keep the suppression scoped to this file.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Validation failures detected by [`GraphBuilder`](super::GraphBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum BuildError {
    /// A module name was defined twice.
    #[error("module `{name}` is defined more than once")]
    #[diagnostic(code(modgraph::graph::duplicate_definition))]
    DuplicateDefinition {
        /// Name of the module.
        name: String,
        /// Location of the second definition.
        span: Option<SourceSpan>,
    },

    /// A bare module attribute is neither a platform nor a known flag.
    #[error("unknown module flag `{key}`")]
    #[diagnostic(
        code(modgraph::graph::unknown_module_flag),
        help("expected one of: common, jvm, js, edit, editJvm, editExpectActual")
    )]
    UnknownModuleFlag {
        /// Offending key.
        key: String,
        /// Location of the attribute.
        span: Option<SourceSpan>,
    },

    /// A module definition carried a `key=value` attribute.
    #[error("unknown module property `{key}`")]
    #[diagnostic(
        code(modgraph::graph::unknown_module_property),
        help("module definitions accept only bare flags")
    )]
    UnknownModuleProperty {
        /// Offending key.
        key: String,
        /// Location of the attribute.
        span: Option<SourceSpan>,
    },

    /// A bare dependency attribute is not recognized.
    #[error("unknown dependency flag `{key}`")]
    #[diagnostic(
        code(modgraph::graph::unknown_dependency_flag),
        help("expected one of: exported, expectedBy, compile, test, runtime, provided")
    )]
    UnknownDependencyFlag {
        /// Offending key.
        key: String,
        /// Location of the attribute.
        span: Option<SourceSpan>,
    },

    /// A dependency carried a `key=value` attribute.
    #[error("unknown dependency property `{key}`")]
    #[diagnostic(
        code(modgraph::graph::unknown_dependency_property),
        help("dependencies accept only bare flags")
    )]
    UnknownDependencyProperty {
        /// Offending key.
        key: String,
        /// Location of the attribute.
        span: Option<SourceSpan>,
    },

    /// A dependency without a target module carried attributes.
    #[error("attributes are not allowed on `{module} ->` without a target module")]
    #[diagnostic(code(modgraph::graph::attributes_not_allowed))]
    AttributesNotAllowed {
        /// Source module of the dangling declaration.
        module: String,
        /// Location of the first attribute.
        span: Option<SourceSpan>,
    },

    /// Internal consistency check failed.
    #[error("graph invariant violated: {message}")]
    #[diagnostic(code(modgraph::graph::invariant))]
    InvariantViolation {
        /// Description of the broken invariant.
        message: String,
    },
}

impl BuildError {
    /// Source location of the offending name or attribute, if known.
    #[must_use]
    pub const fn span(&self) -> Option<SourceSpan> {
        match self {
            Self::DuplicateDefinition { span, .. }
            | Self::UnknownModuleFlag { span, .. }
            | Self::UnknownModuleProperty { span, .. }
            | Self::UnknownDependencyFlag { span, .. }
            | Self::UnknownDependencyProperty { span, .. }
            | Self::AttributesNotAllowed { span, .. } => *span,
            Self::InvariantViolation { .. } => None,
        }
    }

    /// Short label describing what the span points at.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DuplicateDefinition { .. } => "defined again here",
            Self::UnknownModuleFlag { .. }
            | Self::UnknownModuleProperty { .. }
            | Self::UnknownDependencyFlag { .. }
            | Self::UnknownDependencyProperty { .. } => "unrecognized attribute",
            Self::AttributesNotAllowed { .. } => "attribute on a dangling dependency",
            Self::InvariantViolation { .. } => "here",
        }
    }
}

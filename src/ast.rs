//! Declaration records produced by the `modules.txt` parser.
//!
//! Each non-blank line of a modules file yields exactly one [`Declaration`]:
//! either a module definition or a dependency between two modules. The
//! records are plain data; all validation happens when they are fed to
//! [`GraphBuilder`](crate::graph::GraphBuilder).
//!
//! Declarations may also be constructed by hand, which is how callers that
//! bring their own tokenizer drive the builder:
//!
//! ```rust
//! use modgraph::ast::{Attr, Declaration, DependencyDecl, ModuleDecl};
//!
//! let decls = vec![
//!     Declaration::from(ModuleDecl::new("core", vec![Attr::flag("common")])),
//!     Declaration::from(DependencyDecl::new("app", Some("core"), vec![Attr::flag("exported")])),
//! ];
//! assert_eq!(decls.len(), 2);
//! ```

use miette::SourceSpan;

/// A name together with the span it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// The identifier text.
    pub name: String,
    /// Location in the source text, when the identifier came from a file.
    pub span: Option<SourceSpan>,
}

impl Ident {
    /// Create an identifier without source location.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: None,
        }
    }

    /// Attach a source span.
    #[must_use]
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single bracketed attribute: either a bare flag or a `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Attribute key.
    pub key: String,
    /// Value for `key=value` attributes; `None` for bare flags.
    pub value: Option<String>,
    /// Location of the whole attribute in the source text.
    pub span: Option<SourceSpan>,
}

impl Attr {
    /// Create a bare flag attribute such as `exported`.
    #[must_use]
    pub fn flag(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            span: None,
        }
    }

    /// Create a `key=value` attribute.
    #[must_use]
    pub fn key_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            span: None,
        }
    }

    /// Attach a source span.
    #[must_use]
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Whether the attribute is a bare flag.
    #[must_use]
    pub const fn is_flag(&self) -> bool {
        self.value.is_none()
    }
}

/// `name [attrs]`: defines a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDecl {
    /// Module name.
    pub name: Ident,
    /// Attributes in source order.
    pub attrs: Vec<Attr>,
}

impl ModuleDecl {
    /// Create a module definition without source locations.
    #[must_use]
    pub fn new(name: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self {
            name: Ident::new(name),
            attrs,
        }
    }
}

/// `from -> to [attrs]`: declares a dependency.
///
/// When `to` is absent the declaration only ensures `from` exists as a
/// module, possibly as an undefined placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDecl {
    /// Dependent module.
    pub from: Ident,
    /// Module depended upon.
    pub to: Option<Ident>,
    /// Attributes in source order.
    pub attrs: Vec<Attr>,
}

impl DependencyDecl {
    /// Create a dependency declaration without source locations.
    #[must_use]
    pub fn new(from: impl Into<String>, to: Option<&str>, attrs: Vec<Attr>) -> Self {
        Self {
            from: Ident::new(from),
            to: to.map(Ident::new),
            attrs,
        }
    }
}

/// One parsed line of a modules file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A module definition.
    Module(ModuleDecl),
    /// A dependency, possibly dangling.
    Dependency(DependencyDecl),
}

impl From<ModuleDecl> for Declaration {
    fn from(value: ModuleDecl) -> Self {
        Self::Module(value)
    }
}

impl From<DependencyDecl> for Declaration {
    fn from(value: DependencyDecl) -> Self {
        Self::Dependency(value)
    }
}

//! Parser for the `modules.txt` text format.
//!
//! The format is line oriented. Each line holds at most one declaration:
//!
//! ```text
//! // comments start with `//` or `#`
//! core [common]                  # module definition with attributes
//! app [jvm, edit]
//! app -> core [expectedBy]       # dependency with attributes
//! tests -> app [test]
//! orphan ->                      # dangling: only ensures `orphan` exists
//! ```
//!
//! Attributes are bare flags (`exported`) or `key=value` pairs, where a value
//! is a name or a double-quoted string. Whether a given attribute is accepted
//! is decided by [`GraphBuilder`](crate::graph::GraphBuilder), not here.

mod error;
mod lexer;

pub use error::ParseError;

use std::iter::Peekable;
use std::vec::IntoIter;

use miette::SourceSpan;

use crate::ast::{Attr, Declaration, DependencyDecl, Ident, ModuleDecl};
use lexer::{Token, TokenKind};

/// Parse a whole modules file into declarations.
///
/// # Errors
///
/// Returns the first [`ParseError`] in the text.
///
/// # Examples
///
/// ```rust
/// use modgraph::ast::Declaration;
/// use modgraph::parser::parse;
///
/// let decls = parse("a\nb -> a [exported]\n")?;
/// assert!(matches!(decls.as_slice(), [Declaration::Module(_), Declaration::Dependency(_)]));
/// # Ok::<(), modgraph::parser::ParseError>(())
/// ```
pub fn parse(src: &str) -> Result<Vec<Declaration>, ParseError> {
    let tokens = lexer::tokenize(src)?;
    Parser {
        tokens: tokens.into_iter().peekable(),
    }
    .parse_file()
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
}

impl Parser {
    fn parse_file(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut decls = Vec::new();
        while let Some(token) = self.tokens.next() {
            match token.kind {
                TokenKind::Newline => {}
                TokenKind::Ident(name) => {
                    let head = Ident::new(name).with_span(token.span);
                    decls.push(self.parse_declaration(head)?);
                    self.expect_line_end()?;
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "a module name",
                        found: other.describe(),
                        span: token.span,
                    });
                }
            }
        }
        Ok(decls)
    }

    fn parse_declaration(&mut self, head: Ident) -> Result<Declaration, ParseError> {
        if self.eat(&TokenKind::Arrow).is_none() {
            let attrs = self.parse_attrs()?;
            return Ok(ModuleDecl { name: head, attrs }.into());
        }

        let to = match self.tokens.next_if(|t| matches!(t.kind, TokenKind::Ident(_))) {
            Some(Token {
                kind: TokenKind::Ident(name),
                span,
            }) => Some(Ident::new(name).with_span(span)),
            _ => None,
        };
        let attrs = self.parse_attrs()?;
        Ok(DependencyDecl {
            from: head,
            to,
            attrs,
        }
        .into())
    }

    /// Parse an optional `[...]` attribute list.
    fn parse_attrs(&mut self) -> Result<Vec<Attr>, ParseError> {
        let Some(open) = self.eat(&TokenKind::LBracket) else {
            return Ok(Vec::new());
        };

        let mut attrs = Vec::new();
        loop {
            if self.eat(&TokenKind::RBracket).is_some() {
                return Ok(attrs);
            }
            attrs.push(self.parse_attr(open)?);
            if self.eat(&TokenKind::Comma).is_none() {
                self.expect_close(open)?;
                return Ok(attrs);
            }
        }
    }

    fn parse_attr(&mut self, open: SourceSpan) -> Result<Attr, ParseError> {
        let (key, key_span) = match self.tokens.next() {
            Some(Token {
                kind: TokenKind::Ident(key),
                span,
            }) => (key, span),
            Some(Token {
                kind: TokenKind::Newline,
                ..
            })
            | None => return Err(ParseError::UnclosedAttributes { span: open }),
            Some(token) => return Err(unexpected("an attribute name", &token)),
        };
        if self.eat(&TokenKind::Eq).is_none() {
            return Ok(Attr::flag(key).with_span(key_span));
        }
        match self.tokens.next() {
            Some(Token {
                kind: TokenKind::Ident(value) | TokenKind::Str(value),
                span,
            }) => Ok(Attr::key_value(key, value).with_span(join(key_span, span))),
            Some(Token {
                kind: TokenKind::Newline,
                ..
            })
            | None => Err(ParseError::UnclosedAttributes { span: open }),
            Some(token) => Err(unexpected("an attribute value", &token)),
        }
    }

    fn expect_close(&mut self, open: SourceSpan) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(Token {
                kind: TokenKind::RBracket,
                ..
            }) => Ok(()),
            Some(Token {
                kind: TokenKind::Newline,
                ..
            })
            | None => Err(ParseError::UnclosedAttributes { span: open }),
            Some(token) => Err(unexpected("`,` or `]`", &token)),
        }
    }

    fn expect_line_end(&mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(Token {
                kind: TokenKind::Newline,
                ..
            })
            | None => Ok(()),
            Some(token) => Err(unexpected("end of line", &token)),
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> Option<SourceSpan> {
        self.tokens.next_if(|t| t.kind == *kind).map(|t| t.span)
    }
}

fn unexpected(expected: &'static str, token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        expected,
        found: token.kind.describe(),
        span: token.span,
    }
}

fn join(first: SourceSpan, last: SourceSpan) -> SourceSpan {
    let start = first.offset();
    let end = last.offset() + last.len();
    SourceSpan::new(start.into(), end.saturating_sub(start))
}

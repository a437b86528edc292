//! Tokenizer for `modules.txt`.

use miette::SourceSpan;

use super::ParseError;

/// Kind of a lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Module name, attribute key or unquoted value.
    Ident(String),
    /// Double-quoted attribute value, quotes stripped.
    Str(String),
    /// `->`
    Arrow,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `=`
    Eq,
    /// End of a line.
    Newline,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("identifier `{name}`"),
            Self::Str(value) => format!("string \"{value}\""),
            Self::Arrow => "`->`".to_owned(),
            Self::LBracket => "`[`".to_owned(),
            Self::RBracket => "`]`".to_owned(),
            Self::Comma => "`,`".to_owned(),
            Self::Eq => "`=`".to_owned(),
            Self::Newline => "end of line".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: SourceSpan,
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | '-')
}

fn span(start: usize, end: usize) -> SourceSpan {
    SourceSpan::new(start.into(), end.saturating_sub(start))
}

/// Split `src` into tokens. Comments and horizontal whitespace are dropped;
/// every line break produces a [`TokenKind::Newline`].
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let kind = match c {
            '\n' => TokenKind::Newline,
            ' ' | '\t' | '\r' => continue,
            '#' => {
                skip_line(&mut chars);
                continue;
            }
            '/' if chars.peek().is_some_and(|(_, next)| *next == '/') => {
                skip_line(&mut chars);
                continue;
            }
            '-' if chars.peek().is_some_and(|(_, next)| *next == '>') => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Arrow,
                    span: span(start, start + 2),
                });
                continue;
            }
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Eq,
            '"' => {
                let (value, end) = read_string(src, start, &mut chars)?;
                tokens.push(Token {
                    kind: TokenKind::Str(value),
                    span: span(start, end),
                });
                continue;
            }
            c if is_ident_char(c) => {
                let mut end = start + c.len_utf8();
                let mut name = String::from(c);
                while let Some(&(idx, next)) = chars.peek() {
                    let arrow_ahead = next == '-' && src.get(idx + 1..).is_some_and(|rest| rest.starts_with('>'));
                    if !is_ident_char(next) || arrow_ahead {
                        break;
                    }
                    name.push(next);
                    end = idx + next.len_utf8();
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(name),
                    span: span(start, end),
                });
                continue;
            }
            other => {
                return Err(ParseError::UnexpectedCharacter {
                    found: other,
                    span: span(start, start + other.len_utf8()),
                });
            }
        };
        tokens.push(Token {
            kind,
            span: span(start, start + c.len_utf8()),
        });
    }
    Ok(tokens)
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) {
    while chars.next_if(|(_, c)| *c != '\n').is_some() {}
}

fn read_string(
    src: &str,
    start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<(String, usize), ParseError> {
    let mut value = String::new();
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok((value, idx + 1)),
            '\\' => match chars.next() {
                Some((_, '\n')) | None => break,
                Some((_, escaped)) => value.push(escaped),
            },
            '\n' => break,
            other => value.push(other),
        }
    }
    let line_end = src
        .get(start..)
        .and_then(|rest| rest.find('\n'))
        .map_or(src.len(), |offset| start + offset);
    Err(ParseError::UnterminatedString {
        span: span(start, line_end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.to_owned())
    }

    #[test]
    fn arrow_splits_hyphenated_names() {
        assert_eq!(
            kinds("my-app->my-lib"),
            [ident("my-app"), TokenKind::Arrow, ident("my-lib")]
        );
    }

    #[test]
    fn attributes_are_tokenized() {
        assert_eq!(
            kinds("a [jvm, key=\"v w\"]\n"),
            [
                ident("a"),
                TokenKind::LBracket,
                ident("jvm"),
                TokenKind::Comma,
                ident("key"),
                TokenKind::Eq,
                TokenKind::Str("v w".to_owned()),
                TokenKind::RBracket,
                TokenKind::Newline,
            ]
        );
    }

    #[rstest]
    #[case("a // trailing comment\n")]
    #[case("a # trailing comment\n")]
    fn comments_are_skipped(#[case] src: &str) {
        assert_eq!(kinds(src), [ident("a"), TokenKind::Newline]);
    }

    #[test]
    fn token_spans_cover_source_bytes() {
        let tokens = tokenize("ab -> cd").expect("tokenize");
        let spans: Vec<_> = tokens.iter().map(|t| (t.span.offset(), t.span.len())).collect();
        assert_eq!(spans, [(0, 2), (3, 2), (6, 2)]);
    }

    #[test]
    fn unexpected_character_is_reported() {
        let err = tokenize("a ; b").expect_err("should fail");
        assert_eq!(
            err,
            ParseError::UnexpectedCharacter {
                found: ';',
                span: span(2, 3),
            }
        );
    }

    #[test]
    fn unterminated_string_spans_rest_of_line() {
        let err = tokenize("a [k=\"open\nb").expect_err("should fail");
        assert_eq!(err, ParseError::UnterminatedString { span: span(5, 10) });
    }
}

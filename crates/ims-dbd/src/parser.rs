//! DBD parser — assembles the token stream into segment records.
//!
//! Greedy, non-backtracking recursive descent. Record headers are tried
//! in fixed priority order (`SEGM`, `FIELD`, `LCHILD`, `XDFLD`); a
//! keyword mismatch consumes nothing and records a miss reason, but once
//! a header keyword is consumed its attribute list must parse or the
//! whole decode aborts. Every leaf record attaches to the nearest
//! preceding `SEGM`.

use thiserror::Error;

use crate::ast::{Attribute, CrossReference, Field, LeftChild, Segment};
use crate::token::{Span, Token, TokenKind};

/// Parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}, column {column}: unexpected token {text:?}: {}", .attempts.join("; "))]
    Unexpected {
        text: String,
        line: u32,
        column: u32,
        /// Why each record-header rule failed to match here.
        attempts: Vec<String>,
    },
    #[error("line {line}, column {column}: {keyword} record without an enclosing SEGM")]
    RecordOutsideSegment {
        keyword: String,
        line: u32,
        column: u32,
    },
    #[error("line {line}, column {column}: expected attribute keyword, got {text:?}")]
    InvalidAttributeKey { text: String, line: u32, column: u32 },
    #[error("line {line}, column {column}: expected '=' after {key}, got {text:?}")]
    MissingEquals {
        key: String,
        text: String,
        line: u32,
        column: u32,
    },
    #[error("line {line}, column {column}: invalid attribute value {text:?}")]
    InvalidAttributeValue { text: String, line: u32, column: u32 },
}

/// Parse a DBD token stream into its segment records.
pub fn parse(tokens: &[Token]) -> Result<Vec<Segment>, ParseError> {
    let mut parser = Parser::new(tokens);
    parser.parse_dbd()
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof: Token,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        // The lexer terminates every stream with an Eof token; the
        // fallback covers streams built by hand.
        let eof = Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span: tokens.last().map(|t| t.span).unwrap_or_default(),
        };
        Self {
            tokens,
            pos: 0,
            eof,
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn parse_dbd(&mut self) -> Result<Vec<Segment>, ParseError> {
        let mut segments = Vec::new();
        let mut current: Option<Segment> = None;

        loop {
            self.skip_noise(&mut current, &mut segments);

            let mut attempts = Vec::with_capacity(4);

            // SEGM opens a new record, closing any open one.
            if let Some(attributes) = self.try_header(TokenKind::Segm, &mut attempts)? {
                flush(&mut current, &mut segments);
                current = Some(Segment {
                    attributes,
                    ..Segment::default()
                });
                continue;
            }

            // Leaf records attach to the open segment.
            let leaf_span = self.current().span;
            if let Some(attributes) = self.try_header(TokenKind::Field, &mut attempts)? {
                let segment = owner(&mut current, "FIELD", leaf_span)?;
                segment.fields.push(Field { attributes });
                continue;
            }
            if let Some(attributes) = self.try_header(TokenKind::Lchild, &mut attempts)? {
                let segment = owner(&mut current, "LCHILD", leaf_span)?;
                segment.left_children.push(LeftChild { attributes });
                continue;
            }
            if let Some(attributes) = self.try_header(TokenKind::Xdfld, &mut attempts)? {
                let segment = owner(&mut current, "XDFLD", leaf_span)?;
                segment.cross_references.push(CrossReference { attributes });
                continue;
            }

            // No rule matched — close any open record and expect the end
            // of the input.
            flush(&mut current, &mut segments);
            let tok = self.current();
            if tok.kind == TokenKind::Eof {
                return Ok(segments);
            }
            return Err(ParseError::Unexpected {
                text: tok.text.clone(),
                line: tok.span.line,
                column: tok.span.column,
                attempts,
            });
        }
    }

    /// Skip phase: labels and skip-directive lines delimit records but
    /// belong to none, so each one closes any open segment. Bare
    /// end-of-line tokens (blank records, the final sentinel) are
    /// consumed without closing anything.
    fn skip_noise(&mut self, current: &mut Option<Segment>, segments: &mut Vec<Segment>) {
        loop {
            match self.current().kind {
                TokenKind::Label => {
                    self.advance();
                    flush(current, segments);
                }
                TokenKind::SkipLine => {
                    while !matches!(self.current().kind, TokenKind::Eol | TokenKind::Eof) {
                        self.advance();
                    }
                    if self.current().kind == TokenKind::Eol {
                        self.advance();
                    }
                    flush(current, segments);
                }
                TokenKind::Eol => {
                    self.advance();
                }
                _ => return,
            }
        }
    }

    /// Attempt to match one record header at the current position. A
    /// keyword mismatch records the miss reason and consumes nothing;
    /// once the keyword is consumed, the attribute list must parse.
    fn try_header(
        &mut self,
        kind: TokenKind,
        attempts: &mut Vec<String>,
    ) -> Result<Option<Vec<Attribute>>, ParseError> {
        let tok = self.current();
        if tok.kind != kind {
            attempts.push(format!("expected {}, got {:?}", kind, tok.text));
            return Ok(None);
        }
        self.advance();
        let attributes = self.attribute_list()?;
        Ok(Some(attributes))
    }

    /// Parse `KEY=VALUE` pairs with optional comma separators, up to and
    /// including the terminating end-of-line.
    fn attribute_list(&mut self) -> Result<Vec<Attribute>, ParseError> {
        let mut attributes = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Eol => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                TokenKind::Comma => self.advance(),
                _ => attributes.push(self.attribute()?),
            }
        }
        Ok(attributes)
    }

    /// Parse a single `KEY = VALUE` pair.
    fn attribute(&mut self) -> Result<Attribute, ParseError> {
        let tok = self.current();
        if tok.kind != TokenKind::Attr {
            return Err(ParseError::InvalidAttributeKey {
                text: tok.text.clone(),
                line: tok.span.line,
                column: tok.span.column,
            });
        }
        let key = tok.text.clone();
        self.advance();

        let tok = self.current();
        if tok.kind != TokenKind::Equals {
            return Err(ParseError::MissingEquals {
                key,
                text: tok.text.clone(),
                line: tok.span.line,
                column: tok.span.column,
            });
        }
        self.advance();

        let value = self.value()?;
        Ok(Attribute { key, value })
    }

    /// Parse an attribute value: a bare word, or a parenthesized
    /// comma-separated list flattened back into a single `"(a,b,c)"`
    /// string.
    fn value(&mut self) -> Result<String, ParseError> {
        let tok = self.current();
        match tok.kind {
            TokenKind::Ident | TokenKind::Attr => {
                let value = tok.text.clone();
                self.advance();
                Ok(value)
            }
            TokenKind::LParen => {
                let open = tok.span;
                self.advance();
                let mut parts: Vec<String> = Vec::new();
                loop {
                    let tok = self.current();
                    match tok.kind {
                        TokenKind::RParen => {
                            self.advance();
                            break;
                        }
                        TokenKind::Comma => self.advance(),
                        TokenKind::Ident => {
                            parts.push(tok.text.clone());
                            self.advance();
                        }
                        _ => {
                            return Err(ParseError::InvalidAttributeValue {
                                text: tok.text.clone(),
                                line: tok.span.line,
                                column: tok.span.column,
                            });
                        }
                    }
                }
                // An empty list is not a value.
                if parts.is_empty() {
                    return Err(ParseError::InvalidAttributeValue {
                        text: "()".to_string(),
                        line: open.line,
                        column: open.column,
                    });
                }
                Ok(format!("({})", parts.join(",")))
            }
            _ => Err(ParseError::InvalidAttributeValue {
                text: tok.text.clone(),
                line: tok.span.line,
                column: tok.span.column,
            }),
        }
    }
}

fn flush(current: &mut Option<Segment>, segments: &mut Vec<Segment>) {
    if let Some(segment) = current.take() {
        segments.push(segment);
    }
}

fn owner<'s>(
    current: &'s mut Option<Segment>,
    keyword: &str,
    span: Span,
) -> Result<&'s mut Segment, ParseError> {
    match current {
        Some(segment) => Ok(segment),
        None => Err(ParseError::RecordOutsideSegment {
            keyword: keyword.to_string(),
            line: span.line,
            column: span.column,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! DBD lexer — column-sensitive tokenizer for the 80-column macro format.
//!
//! Classification is column-sensitive because the macro language reuses
//! plain words for directives, labels, and attribute keys, distinguished
//! only by fixed column position:
//! - **Column 0**: statement label
//! - **Column 7**: directive operation (skipped line)
//! - **Column 71**: continuation marker (`*`), followed by an
//!   8-character line-identifier field and an immediate newline
//! - **Columns 72-79**: sequence/identification tail (never tokenized)
//! - A newline is only legal at column 80

use thiserror::Error;

use crate::token::{Span, Token, TokenKind};

/// The closed attribute-keyword vocabulary of the DBD macro language.
const ATTRIBUTE_KEYWORDS: &[&str] = &[
    "BYTES", "COMPRTN", "CONST", "DDATA", "DSGROUP", "EXIT", "EXTRN", "FREQ", "INDEX", "NAME",
    "NULLVAL", "PAIR", "PARENT", "POINTER", "PTR", "RKSIZE", "RMNAME", "RULES", "SEGMENT",
    "SOURCE", "SRCH", "SSPTR", "START", "SUBSEQ", "TYPE",
];

/// Column of the continuation marker.
const CONTINUATION_COLUMN: u32 = 71;
/// First column of the sequence/identification tail.
const SEQUENCE_COLUMN: u32 = 72;
/// Column a newline must sit at.
const RECORD_END_COLUMN: u32 = 80;
/// Column of a directive operation word.
const DIRECTIVE_COLUMN: u32 = 7;

/// Lexer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("line {line}, column {column}: record does not end at column 80")]
    BadLineLength { line: u32, column: u32 },
    #[error("line {line}, column {column}: continuation marker outside column 71")]
    InvalidContinuation { line: u32, column: u32 },
    #[error("line {line}, column {column}: no newline after continuation")]
    UnterminatedContinuation { line: u32, column: u32 },
}

/// Tokenize DBD source text.
///
/// The stream always ends with an `Eol` sentinel followed by `Eof`.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    lexer.tokenize()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];

            if c == '\n' {
                if self.column != RECORD_END_COLUMN {
                    return Err(LexError::BadLineLength {
                        line: self.line,
                        column: self.column,
                    });
                }
                tokens.push(self.token(TokenKind::Eol, ""));
                self.pos += 1;
                self.line += 1;
                self.column = 0;
                continue;
            }

            if c.is_whitespace() {
                self.advance();
                continue;
            }

            // Sequence/identification tail — never tokenized, whether or
            // not a preprocessing pass already dropped it.
            if self.column >= SEQUENCE_COLUMN {
                self.advance();
                continue;
            }

            match c {
                '*' => self.continuation()?,
                '=' => {
                    tokens.push(self.token(TokenKind::Equals, "="));
                    self.advance();
                }
                ',' => {
                    tokens.push(self.token(TokenKind::Comma, ","));
                    self.advance();
                }
                '(' => {
                    tokens.push(self.token(TokenKind::LParen, "("));
                    self.advance();
                }
                ')' => {
                    tokens.push(self.token(TokenKind::RParen, ")"));
                    self.advance();
                }
                _ => {
                    let tok = self.word();
                    tokens.push(tok);
                }
            }
        }

        tokens.push(self.token(TokenKind::Eol, ""));
        tokens.push(self.token(TokenKind::Eof, ""));
        Ok(tokens)
    }

    /// Consume a continuation marker: the `*` in column 71, the
    /// 8-character line-identifier field, and the newline after it.
    /// The statement logically continues, so no `Eol` is emitted.
    fn continuation(&mut self) -> Result<(), LexError> {
        if self.column != CONTINUATION_COLUMN {
            return Err(LexError::InvalidContinuation {
                line: self.line,
                column: self.column,
            });
        }
        self.pos += 9;
        self.column += 9;
        match self.peek() {
            Some('\n') => {
                self.pos += 1;
                self.line += 1;
                self.column = 0;
                Ok(())
            }
            _ => Err(LexError::UnterminatedContinuation {
                line: self.line,
                column: self.column,
            }),
        }
    }

    /// Consume a bare word and classify it.
    fn word(&mut self) -> Token {
        let span = self.span();
        let start = self.pos;
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            if c.is_whitespace() || matches!(c, '=' | ',' | '(' | ')') {
                break;
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let kind = classify(&text, span.column);
        self.column += (self.pos - start) as u32;
        Token { kind, text, span }
    }

    fn advance(&mut self) {
        self.pos += 1;
        self.column += 1;
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
        }
    }

    fn token(&self, kind: TokenKind, text: &str) -> Token {
        Token {
            kind,
            text: text.to_string(),
            span: self.span(),
        }
    }
}

/// Classify a bare word: exact header keywords first, then the attribute
/// vocabulary, then by starting column.
fn classify(word: &str, column: u32) -> TokenKind {
    match word {
        "SEGM" => TokenKind::Segm,
        "FIELD" => TokenKind::Field,
        "LCHILD" => TokenKind::Lchild,
        "XDFLD" => TokenKind::Xdfld,
        _ if ATTRIBUTE_KEYWORDS.contains(&word) => TokenKind::Attr,
        _ if column == 0 => TokenKind::Label,
        _ if column == DIRECTIVE_COLUMN || word == "DBD" || word == "DATASET" => {
            TokenKind::SkipLine
        }
        _ => TokenKind::Ident,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Pad `content` into a full 80-column record with a sequence number.
    fn record(content: &str) -> String {
        format!("{:<72}{}\n", content, "00000010")
    }

    /// Same, with a continuation marker in column 71.
    fn continued(content: &str) -> String {
        format!("{:<71}*{}\n", content, "00000020")
    }

    /// Lex and strip `Eol`/`Eof` for compact kind/text comparisons.
    fn words(src: &str) -> Vec<(TokenKind, String)> {
        lex(src)
            .unwrap()
            .into_iter()
            .filter(|t| !matches!(t.kind, TokenKind::Eol | TokenKind::Eof))
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_segm_statement() {
        let src = record("         SEGM  NAME=WARD,BYTES=31");
        assert_eq!(
            words(&src),
            vec![
                (TokenKind::Segm, "SEGM".to_string()),
                (TokenKind::Attr, "NAME".to_string()),
                (TokenKind::Equals, "=".to_string()),
                (TokenKind::Ident, "WARD".to_string()),
                (TokenKind::Comma, ",".to_string()),
                (TokenKind::Attr, "BYTES".to_string()),
                (TokenKind::Equals, "=".to_string()),
                (TokenKind::Ident, "31".to_string()),
            ]
        );
    }

    #[test]
    fn test_header_keywords() {
        let src = record("         LCHILD NAME=(SEGA,DBDA),PAIR=SEGB");
        let kinds: Vec<TokenKind> = words(&src).into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds[0], TokenKind::Lchild);
        assert!(kinds.contains(&TokenKind::LParen));
        assert!(kinds.contains(&TokenKind::RParen));
    }

    #[test]
    fn test_label_at_column_zero() {
        let src = record("HOSPDBD  DBD   NAME=HOSPDBD");
        let toks = lex(&src).unwrap();
        assert_eq!(toks[0].kind, TokenKind::Label);
        assert_eq!(toks[0].text, "HOSPDBD");
        assert_eq!(toks[0].span.line, 1);
        assert_eq!(toks[0].span.column, 0);
        assert_eq!(toks[1].kind, TokenKind::SkipLine);
        assert_eq!(toks[1].text, "DBD");
    }

    #[test]
    fn test_directive_at_column_seven() {
        let src = record("       DBDGEN");
        let toks = lex(&src).unwrap();
        assert_eq!(toks[0].kind, TokenKind::SkipLine);
        assert_eq!(toks[0].span.column, 7);
    }

    #[test]
    fn test_dataset_is_skip_directive() {
        let src = record("         DATASET DD1=HOSPITAL");
        let toks = lex(&src).unwrap();
        assert_eq!(toks[0].kind, TokenKind::SkipLine);
        assert_eq!(toks[0].text, "DATASET");
    }

    #[test]
    fn test_unknown_word_is_ident() {
        let src = record("         SEGM  NAME=WARD,FREQ=ABC123");
        let toks = words(&src);
        assert_eq!(toks.last().unwrap(), &(TokenKind::Ident, "ABC123".to_string()));
    }

    #[test]
    fn test_sequence_tail_skipped() {
        let src = record("         SEGM  NAME=WARD");
        let toks = words(&src);
        assert!(toks.iter().all(|(_, text)| text != "00000010"));
    }

    #[test]
    fn test_newline_off_column_80() {
        let err = lex("SEGM NAME=A\n").unwrap_err();
        assert_eq!(
            err,
            LexError::BadLineLength {
                line: 1,
                column: 11
            }
        );
    }

    #[test]
    fn test_continuation_consumes_marker_and_tail() {
        let src = format!(
            "{}{}",
            continued("         SEGM  NAME=PATIENT,PARENT=HOSPITAL,"),
            record(&format!("{:14}BYTES=125", "")),
        );
        let toks = words(&src);
        // One uninterrupted attribute list across the join point.
        let texts: Vec<&str> = toks.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "SEGM", "NAME", "=", "PATIENT", ",", "PARENT", "=", "HOSPITAL", ",", "BYTES",
                "=", "125",
            ]
        );
        // No Eol between the continued halves: the marker swallowed it.
        let full = lex(&src).unwrap();
        let eols = full
            .iter()
            .filter(|t| t.kind == TokenKind::Eol)
            .count();
        assert_eq!(eols, 2); // line 2's newline + the final sentinel
    }

    #[test]
    fn test_joined_continuation_matches_single_line() {
        let split = format!(
            "{}{}",
            continued("         SEGM  NAME=PATIENT,PARENT=HOSPITAL,"),
            record(&format!("{:14}BYTES=125", "")),
        );
        let joined = record("         SEGM  NAME=PATIENT,PARENT=HOSPITAL,BYTES=125");
        assert_eq!(words(&split), words(&joined));
    }

    #[test]
    fn test_marker_outside_column_71() {
        let src = record("         SEGM  NAME=WARD *");
        let err = lex(&src).unwrap_err();
        assert_eq!(
            err,
            LexError::InvalidContinuation {
                line: 1,
                column: 25
            }
        );
    }

    #[test]
    fn test_continuation_at_end_of_input() {
        // Marker line with nothing after the identifier field.
        let src = format!("{:<71}*{}", "         SEGM  NAME=WARD,", "00000030");
        let err = lex(&src).unwrap_err();
        assert!(matches!(
            err,
            LexError::UnterminatedContinuation { line: 1, .. }
        ));
    }

    #[test]
    fn test_sentinel_tokens() {
        let src = record("         SEGM  NAME=WARD");
        let toks = lex(&src).unwrap();
        let n = toks.len();
        assert_eq!(toks[n - 2].kind, TokenKind::Eol);
        assert_eq!(toks[n - 1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_empty_input() {
        let toks = lex("").unwrap();
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].kind, TokenKind::Eol);
        assert_eq!(toks[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_classify_precedence() {
        // Header keywords win over every column rule.
        assert_eq!(classify("SEGM", 0), TokenKind::Segm);
        // Attribute keywords win over label/directive columns.
        assert_eq!(classify("NAME", 0), TokenKind::Attr);
        assert_eq!(classify("NAME", 7), TokenKind::Attr);
        // Column rules apply only to unknown words.
        assert_eq!(classify("ANYTHING", 0), TokenKind::Label);
        assert_eq!(classify("ANYTHING", 7), TokenKind::SkipLine);
        assert_eq!(classify("DBD", 30), TokenKind::SkipLine);
        assert_eq!(classify("ANYTHING", 30), TokenKind::Ident);
    }
}

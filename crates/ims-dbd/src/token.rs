//! DBD token types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source location for a token.
///
/// `line` is 1-based. `column` is the 0-based position within the
/// 80-column record, so the fixed-column rules read directly off it:
/// labels start at column 0, directives at column 7, the continuation
/// marker sits at column 71, and the sequence tail occupies columns
/// 72-79.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Line number (1-based).
    pub line: u32,
    /// Column number (0-based).
    pub column: u32,
}

/// A DBD source token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token (empty for `Eol`/`Eof`).
    pub text: String,
    pub span: Span,
}

/// DBD token types.
///
/// The macro language reuses plain words for directives, labels, and
/// attribute keys, distinguished only by column position. Classification
/// is therefore the lexer's job; the parser never re-inspects token text
/// to decide what a word is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// `SEGM` record header.
    Segm,
    /// `FIELD` record header.
    Field,
    /// `LCHILD` (logical child) record header.
    Lchild,
    /// `XDFLD` (indexed-field cross-reference) record header.
    Xdfld,
    /// A word from the closed attribute-keyword vocabulary
    /// (NAME, BYTES, PARENT, ...).
    Attr,
    /// Any other bare word.
    Ident,
    /// A word starting in column 0 (statement label).
    Label,
    /// The operation of a line to be skipped whole: a column-7 word, or
    /// `DBD`/`DATASET` anywhere.
    SkipLine,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// End of line.
    Eol,
    /// End of source.
    Eof,
}

impl TokenKind {
    /// Check if this is a record-header keyword.
    pub fn is_header(&self) -> bool {
        matches!(
            self,
            TokenKind::Segm | TokenKind::Field | TokenKind::Lchild | TokenKind::Xdfld
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Segm => "SEGM",
            TokenKind::Field => "FIELD",
            TokenKind::Lchild => "LCHILD",
            TokenKind::Xdfld => "XDFLD",
            TokenKind::Attr => "attribute keyword",
            TokenKind::Ident => "identifier",
            TokenKind::Label => "label",
            TokenKind::SkipLine => "skip directive",
            TokenKind::Equals => "=",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Eol => "end of line",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

//! IMS DBD (Database Definition) source decoder.
//!
//! Decodes the fixed-column 80-character DBD macro format into an
//! ordered tree of segment records:
//!
//! - **Preprocessor** — record validation and continuation stitching
//!   into logical lines
//! - **Lexer** — column-sensitive tokenizer over the raw text
//! - **Parser** — recursive descent over the token stream, producing
//!   `SEGM` records that own their `FIELD`/`LCHILD`/`XDFLD` children
//!
//! # Example
//!
//! ```ignore
//! let segments = ims_dbd::decode(&source)?;
//! for segment in &segments {
//!     println!("SEGM {} ({} fields)", segment.name().unwrap_or("?"), segment.fields.len());
//! }
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod preprocess;
pub mod token;

pub use ast::{Attribute, CrossReference, Field, LeftChild, Segment};
pub use error::{DbdError, DbdResult};
pub use lexer::{lex, LexError};
pub use parser::{parse, ParseError};
pub use preprocess::{logical_lines, LogicalLine, PreprocessError};
pub use token::{Span, Token, TokenKind};

/// Decode DBD source text into its segment records.
///
/// The entire input is decoded in one pass; the first record-format or
/// grammar error aborts the decode.
pub fn decode(source: &str) -> DbdResult<Vec<Segment>> {
    let tokens = lexer::lex(source)?;
    let segments = parser::parse(&tokens)?;
    Ok(segments)
}

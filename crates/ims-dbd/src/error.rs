//! Crate-level error type for the decode pipeline.

use thiserror::Error;

use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::preprocess::PreprocessError;

/// Any error raised while decoding DBD source.
///
/// All errors are terminal: a decode either returns the complete segment
/// sequence or the first position-qualified error, with no partial
/// results and no recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbdError {
    /// Record-format error from the preprocessor.
    #[error("{0}")]
    Preprocess(#[from] PreprocessError),
    /// Fixed-column tokenization error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// Grammar error from the parser.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Convenience result type.
pub type DbdResult<T> = std::result::Result<T, DbdError>;

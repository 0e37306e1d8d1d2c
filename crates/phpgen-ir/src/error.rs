use thiserror::Error;

/// Errors raised while reading IR from text or JSON.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("unexpected character {ch:?} at {line}:{column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    #[error("invalid number literal `{text}` at {line}:{column}")]
    InvalidNumber {
        text: String,
        line: usize,
        column: usize,
    },

    #[error("nodes nested deeper than {limit} levels at {line}:{column}")]
    NestingTooDeep {
        limit: usize,
        line: usize,
        column: usize,
    },

    #[error("unterminated literal starting at {line}:{column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid JSON IR node: {reason}")]
    InvalidJsonNode { reason: String },
}

use thiserror::Error;

/// Errors raised while building or rendering PHP syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A name does not match `[A-Za-z_\x7F-\xFF][A-Za-z0-9_\x7F-\xFF]*`.
    #[error("invalid PHP identifier name: {name:?}")]
    InvalidName { name: String },

    /// An operand sits where rendering needs a specific kind of node.
    #[error("malformed operand in {context}: expected {expected}, found {found}")]
    MalformedOperand {
        context: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

use phpgen_syntax::SyntaxError;
use thiserror::Error;

/// Errors raised while transducing IR into PHP syntax.
///
/// `location` is the chain of enclosing IR tags, outermost first, ending with
/// the offending node (e.g. `defn > scope > block > call`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransduceError {
    /// Unknown tag, wrong field shape for a known tag, or a construct the
    /// rules cannot map onto PHP.
    #[error("unsupported construct `{tag}` ({reason}): received {shape} at {location}")]
    UnsupportedConstruct {
        tag: String,
        shape: String,
        reason: String,
        location: String,
    },

    #[error("IR nesting exceeds {limit} levels at {location}")]
    NestingTooDeep { limit: usize, location: String },

    /// Invalid name or malformed operand raised by the syntax layer.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

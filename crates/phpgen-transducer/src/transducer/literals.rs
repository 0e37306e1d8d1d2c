use phpgen_ir::{Field, Scalar, Sexp};
use phpgen_syntax::{BinaryOp, Literal, Node, SyntaxError, UnaryOp};

use super::Transducer;
use crate::error::TransduceError;

/// `(lit <scalar>)`. Symbols become bare identifiers.
pub(super) fn literal(scalar: &Scalar) -> Result<Node, SyntaxError> {
    Ok(match scalar {
        Scalar::Nil => Node::null(),
        Scalar::Bool(value) => Node::bool(*value),
        Scalar::Integer(value) => Node::int(*value),
        Scalar::Float(value) => Node::float(*value),
        Scalar::String(text) => Node::string(text.as_str()),
        Scalar::Symbol(name) => Node::id(name.as_str())?,
        Scalar::Range {
            start,
            end,
            exclusive,
        } => Node::range(*start, *end, *exclusive),
        Scalar::Regex { pattern, flags } => Node::Literal(Literal::Regex {
            pattern: pattern.clone(),
            flags: flags.clone(),
        }),
    })
}

/// `` `command` ``
pub(super) fn shell_command(command: &str) -> Node {
    Node::unary(UnaryOp::Execution, Node::string(command))
}

/// The value of `(lit <integer>)`, if `sexp` is one.
fn integer_literal(sexp: &Sexp) -> Option<i64> {
    match sexp.fields.as_slice() {
        [Field::Scalar(Scalar::Integer(value))] if sexp.is("lit") => Some(*value),
        _ => None,
    }
}

impl<'a> Transducer<'a> {
    /// `"a#{b}c"` becomes `"a" . ($b . "c")`: a right fold of concatenations.
    pub(super) fn interpolation(
        &mut self,
        prefix: &str,
        parts: &[&'a Sexp],
    ) -> Result<Node, TransduceError> {
        let mut pieces = Vec::with_capacity(parts.len() + 1);
        if !prefix.is_empty() {
            pieces.push(Node::string(prefix));
        }
        for &part in parts {
            pieces.push(self.node(part)?);
        }
        Ok(pieces
            .into_iter()
            .rev()
            .reduce(|tail, piece| Node::concat(piece, tail))
            .unwrap_or_else(|| Node::string("")))
    }

    pub(super) fn hash(&mut self, pairs: &[(&'a Sexp, &'a Sexp)]) -> Result<Node, TransduceError> {
        let mut entries = Vec::with_capacity(pairs.len());
        for &(key, value) in pairs {
            let key = self.node(key)?;
            let value = self.node(value)?;
            entries.push((key, value));
        }
        Ok(Node::hash(entries))
    }

    /// Literal bounds give a range literal; computed bounds call `range()`
    /// directly, subtracting one from the end of an exclusive range.
    pub(super) fn range(
        &mut self,
        low: &'a Sexp,
        high: &'a Sexp,
        exclusive: bool,
    ) -> Result<Node, TransduceError> {
        if let (Some(start), Some(end)) = (integer_literal(low), integer_literal(high)) {
            return Ok(Node::range(start, end, exclusive));
        }
        let start = self.node(low)?;
        let mut end = self.node(high)?;
        if exclusive {
            end = Node::binary(end, BinaryOp::Subtract, Node::int(1));
        }
        Ok(Node::call("range", vec![start, end])?)
    }
}

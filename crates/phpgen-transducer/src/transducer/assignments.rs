use phpgen_ir::{Field, Sexp};
use phpgen_syntax::{Identifier, Node, SyntaxError, Variable};

use super::Transducer;
use crate::error::TransduceError;

/// `$this->name`
pub(super) fn this_property(name: &str) -> Result<Node, SyntaxError> {
    Ok(Node::index(Node::Variable(Variable::this()), Node::id(name)?))
}

impl<'a> Transducer<'a> {
    /// `target = value`, or the bare target when there is no value.
    pub(super) fn assignment(
        &mut self,
        target: Node,
        value: Option<&'a Sexp>,
    ) -> Result<Node, TransduceError> {
        match value {
            Some(value) => Ok(Node::assign(target, self.node(value)?)),
            None => Ok(target),
        }
    }

    /// `NAME = value` at top level becomes `define("NAME", value)`.
    pub(super) fn constant_declaration(
        &mut self,
        name: &str,
        value: &'a Sexp,
    ) -> Result<Node, TransduceError> {
        let name = Identifier::new(name)?;
        let value = self.node(value)?;
        Ok(Node::call("define", vec![Node::string(name.as_str()), value])?)
    }

    /// `a, b = value` becomes `list($a, $b) = value`.
    pub(super) fn multiple_assignment(
        &mut self,
        sexp: &'a Sexp,
        targets: &'a Sexp,
        value: Option<&'a Sexp>,
    ) -> Result<Node, TransduceError> {
        let Some(value) = value else {
            return Err(self.reject(sexp, "multiple assignment without a value"));
        };
        let mut list = Vec::new();
        self.assignment_targets(targets, &mut list)?;
        let value = self.unpacked_value(value)?;
        Ok(Node::assign(Node::call("list", list)?, value))
    }

    /// Flatten `(array target...)` into `out`, descending into nested `masgn`.
    pub(super) fn assignment_targets(
        &mut self,
        targets: &'a Sexp,
        out: &mut Vec<Node>,
    ) -> Result<(), TransduceError> {
        if !targets.is("array") {
            return Err(self.reject_child(targets, "expected node(array) of assignment targets"));
        }
        for field in &targets.fields {
            let Field::Node(target) = field else {
                return Err(self.reject_child(targets, "expected only node fields"));
            };
            if target.is("masgn") {
                let Some(Field::Node(nested)) = target.fields.first() else {
                    return Err(self.reject_child(target, "expected node(array) as field 1"));
                };
                self.assignment_targets(nested, out)?;
            } else {
                out.push(self.node(target)?);
            }
        }
        Ok(())
    }

    /// Right-hand side of a multiple assignment; `to_ary` and `splat`
    /// wrappers are transparent.
    fn unpacked_value(&mut self, value: &'a Sexp) -> Result<Node, TransduceError> {
        if !(value.is("to_ary") || value.is("splat")) {
            return self.node(value);
        }
        match value.fields.as_slice() {
            [Field::Node(inner)] => self.node(inner),
            _ => Err(self.reject_child(value, "expected 1 node field")),
        }
    }
}

use phpgen_ir::Sexp;
use phpgen_syntax::{Identifier, Node};

use super::Transducer;
use crate::error::TransduceError;
use crate::operators::{RubyOperator, operator_for};
use crate::shape::is_regex_literal;

impl<'a> Transducer<'a> {
    /// Disambiguate a method call.
    ///
    /// Without a receiver: a bare name is a variable, a name with arguments a
    /// function call. With a receiver, in order: operator names, `new`, `[]`,
    /// `[]=`, identifiers (method calls), then `name=` (property assignment).
    pub(super) fn call(
        &mut self,
        sexp: &'a Sexp,
        receiver: Option<&'a Sexp>,
        name: &'a str,
        args: &[&'a Sexp],
    ) -> Result<Node, TransduceError> {
        let Some(receiver) = receiver else {
            if args.is_empty() {
                return Ok(Node::var(name)?);
            }
            let arguments = self.nodes(args)?;
            return Ok(Node::call(name, arguments)?);
        };

        if let Some(op) = operator_for(name) {
            return self.operator(sexp, op, name, receiver, args);
        }

        match name {
            "new" => {
                let class = self.node(receiver)?;
                let arguments = self.nodes(args)?;
                Ok(Node::method(class, "new", arguments)?)
            }
            "[]" => {
                let &[key] = args else {
                    return Err(self.wrong_argument_count(sexp, name, 1, args.len()));
                };
                let container = self.node(receiver)?;
                Ok(Node::index(container, self.node(key)?))
            }
            "[]=" => {
                let &[key, value] = args else {
                    return Err(self.wrong_argument_count(sexp, name, 2, args.len()));
                };
                let container = self.node(receiver)?;
                let key = self.node(key)?;
                Ok(Node::assign(Node::index(container, key), self.node(value)?))
            }
            _ if Identifier::is_valid(name) => {
                let object = self.node(receiver)?;
                let arguments = self.nodes(args)?;
                Ok(Node::method(object, name, arguments)?)
            }
            _ => match name.strip_suffix('=') {
                Some(property) if Identifier::is_valid(property) => {
                    let &[value] = args else {
                        return Err(self.wrong_argument_count(sexp, name, 1, args.len()));
                    };
                    let object = self.node(receiver)?;
                    let target = Node::index(object, Node::id(property)?);
                    Ok(Node::assign(target, self.node(value)?))
                }
                _ => Err(self.reject(
                    sexp,
                    format!("method name `{name}` is neither an identifier nor an operator"),
                )),
            },
        }
    }

    fn operator(
        &mut self,
        sexp: &'a Sexp,
        op: RubyOperator,
        name: &str,
        receiver: &'a Sexp,
        args: &[&'a Sexp],
    ) -> Result<Node, TransduceError> {
        match (op, args) {
            (RubyOperator::Unary(op), []) => Ok(Node::unary(op, self.node(receiver)?)),
            (RubyOperator::Binary(op), &[rhs]) => {
                let lhs = self.node(receiver)?;
                let rhs = self.node(rhs)?;
                Ok(Node::binary(lhs, op, rhs))
            }
            (RubyOperator::Match, &[argument]) => self.regex_match(receiver, argument),
            (RubyOperator::NotMatch, &[argument]) => {
                Ok(Node::not(self.regex_match(receiver, argument)?))
            }
            _ => Err(self.wrong_argument_count(sexp, name, op.arity(), args.len())),
        }
    }

    /// `a =~ b`: whichever side is a regex literal is the pattern; otherwise
    /// the argument is.
    fn regex_match(&mut self, receiver: &'a Sexp, argument: &'a Sexp) -> Result<Node, TransduceError> {
        let (pattern, subject) = if is_regex_literal(receiver) {
            (receiver, argument)
        } else {
            (argument, receiver)
        };
        let pattern = self.node(pattern)?;
        let subject = self.node(subject)?;
        Ok(Node::pattern_match(pattern, subject))
    }

    fn wrong_argument_count(
        &self,
        sexp: &Sexp,
        name: &str,
        expected: usize,
        found: usize,
    ) -> TransduceError {
        let plural = if expected == 1 { "" } else { "s" };
        self.reject(
            sexp,
            format!("`{name}` expects {expected} argument{plural}, found {found}"),
        )
    }
}

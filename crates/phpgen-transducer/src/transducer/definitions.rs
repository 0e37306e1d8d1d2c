use phpgen_ir::{Scalar, Sexp};
use phpgen_syntax::{Block, Class, Function, Identifier, Interface, Node, Variable};

use super::Transducer;
use crate::error::TransduceError;
use crate::shape::Ir;

impl<'a> Transducer<'a> {
    /// Named function from either `defn` layout:
    /// - `(defn :name (scope (block (args ...) stmt...)))`
    /// - `(defn :name (args ...) (scope (block stmt...)))`
    pub(super) fn function_definition(
        &mut self,
        name: &str,
        args: Option<&'a Sexp>,
        scope: &'a Sexp,
    ) -> Result<Function, TransduceError> {
        let name = Identifier::new(name)?;
        let explicit = args.map(|args| self.parameters(args)).transpose()?;
        self.scope_body(scope, |this, mut statements| {
            let parameters = match explicit {
                Some(parameters) => parameters,
                None if statements.first().is_some_and(|first| first.is("args")) => {
                    let args = statements.remove(0);
                    this.parameters(args)?
                }
                None => Vec::new(),
            };
            let body = this.function_body(&statements)?;
            Ok(Function::new(Some(name), parameters, body))
        })
    }

    /// `(args :a :b)`. Rest, block and defaulted parameters are rejected.
    pub(super) fn parameters(&self, args: &'a Sexp) -> Result<Vec<Variable>, TransduceError> {
        args.fields
            .iter()
            .map(|field| match field.as_scalar().and_then(Scalar::as_name) {
                Some(name) if name.starts_with(['*', '&']) => Err(self.reject_child(
                    args,
                    format!("splat and block parameter `{name}` has no PHP equivalent"),
                )),
                Some(name) => Variable::local(name).map_err(TransduceError::from),
                None => Err(self.reject_child(args, "default parameter values are not supported")),
            })
            .collect()
    }

    /// A body holding nothing but `(nil)` is no body.
    fn function_body(&mut self, statements: &[&'a Sexp]) -> Result<Option<Block>, TransduceError> {
        match statements {
            [] => Ok(None),
            [only] if only.is("nil") && only.fields.is_empty() => Ok(None),
            _ => Ok(Some(Block::new(self.statements(statements)?))),
        }
    }

    /// Classes hold method definitions only.
    pub(super) fn class_definition(
        &mut self,
        name: &str,
        parent: Option<&'a Sexp>,
        scope: &'a Sexp,
    ) -> Result<Node, TransduceError> {
        let name = Identifier::new(name)?;
        let parent = match parent {
            None => None,
            Some(parent) => match self.node(parent)? {
                Node::Identifier(parent) => Some(parent),
                other => {
                    return Err(self.reject_child(
                        parent,
                        format!("superclass must be a constant, found {}", other.kind_name()),
                    ));
                }
            },
        };
        let members = self.scope_body(scope, |this, statements| {
            statements
                .into_iter()
                .map(|statement| this.method_definition(statement))
                .collect::<Result<Vec<_>, _>>()
        })?;
        Ok(Node::Class(Class::new(name, parent, members)))
    }

    fn method_definition(&mut self, statement: &'a Sexp) -> Result<Function, TransduceError> {
        self.node_with(statement, |this, ir| match ir {
            Ir::Defn { name, args, scope } => this.function_definition(name, args, scope),
            _ => Err(this.reject(statement, "class bodies may only contain method definitions")),
        })
    }

    /// A module with an empty body declares an interface.
    pub(super) fn module_definition(
        &mut self,
        name: &str,
        scope: &'a Sexp,
    ) -> Result<Node, TransduceError> {
        let name = Identifier::new(name)?;
        self.scope_body(scope, |this, statements| match statements.first() {
            None => Ok(Node::Interface(Interface { name })),
            Some(first) => Err(this.reject_child(first, "module bodies must be empty")),
        })
    }
}

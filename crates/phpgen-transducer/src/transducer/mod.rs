//! IR to PHP syntax transduction.
//!
//! The `Transducer` walks the raw tree depth-first. At each node it decodes
//! the shape into `Ir` and lowers it with one exhaustive match. Rules are
//! split by construct family:
//! - `literals.rs` - scalars, strings, interpolation, ranges
//! - `calls.rs` - method-call disambiguation and operators
//! - `assignments.rs` - single, property and multiple assignment
//! - `control_flow.rs` - conditionals, loops, iterator blocks
//! - `definitions.rs` - functions, classes, modules

use phpgen_ir::{Field, Scalar, Sexp};
use phpgen_syntax::{BinaryOp, Block, Node, Program, Variable};
use tracing::{debug, trace};

use crate::error::TransduceError;
use crate::limits::{MAX_TRANSDUCE_DEPTH, STACK_RED_ZONE, STACK_SEGMENT};
use crate::shape::Ir;

mod assignments;
mod calls;
mod control_flow;
mod definitions;
mod literals;

/// Transduce a single IR node.
pub fn transduce(node: &Sexp) -> Result<Node, TransduceError> {
    Transducer::new().node(node)
}

/// Transduce a sequence of top-level IR nodes into a program.
///
/// Top-level `block` nodes are spliced into the program's statement list.
pub fn transduce_program(nodes: &[Sexp]) -> Result<Program, TransduceError> {
    Transducer::new().program(nodes)
}

/// Tree walker state for one transduction: the chain of enclosing tags.
#[derive(Debug, Default)]
pub struct Transducer<'a> {
    path: Vec<&'a str>,
}

impl<'a> Transducer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(&mut self, nodes: &'a [Sexp]) -> Result<Program, TransduceError> {
        let _span = tracing::debug_span!("transduce_program", nodes = nodes.len()).entered();
        let roots: Vec<&'a Sexp> = nodes.iter().collect();
        Ok(Program::new(self.statements(&roots)?))
    }

    pub fn node(&mut self, sexp: &'a Sexp) -> Result<Node, TransduceError> {
        self.node_with(sexp, |this, ir| this.lower(sexp, ir))
    }

    /// Enter `sexp`, decode it and hand the decoded shape to `lower`.
    fn node_with<T>(
        &mut self,
        sexp: &'a Sexp,
        lower: impl FnOnce(&mut Self, Ir<'a>) -> Result<T, TransduceError>,
    ) -> Result<T, TransduceError> {
        self.path.push(&sexp.tag);
        let result = if self.path.len() > MAX_TRANSDUCE_DEPTH {
            Err(TransduceError::NestingTooDeep {
                limit: MAX_TRANSDUCE_DEPTH,
                location: self.location(),
            })
        } else {
            trace!(tag = %sexp.tag, depth = self.path.len(), "transduce node");
            stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || match Ir::decode(sexp) {
                Ok(ir) => lower(self, ir),
                Err(err) => Err(self.reject(sexp, err.reason)),
            })
        };
        self.path.pop();
        result
    }

    fn lower(&mut self, sexp: &'a Sexp, ir: Ir<'a>) -> Result<Node, TransduceError> {
        match ir {
            Ir::Nil => Ok(Node::null()),
            Ir::True => Ok(Node::bool(true)),
            Ir::False => Ok(Node::bool(false)),
            Ir::SelfRef => Ok(Node::Variable(Variable::this())),
            Ir::Lit(scalar) => Ok(literals::literal(scalar)?),
            Ir::Str(text) => Ok(Node::string(text)),
            Ir::XStr(command) => Ok(literals::shell_command(command)),
            Ir::DStr { prefix, parts } => self.interpolation(prefix, &parts),
            Ir::EvStr(expr) => match expr {
                Some(expr) => self.node(expr),
                None => Ok(Node::string("")),
            },
            Ir::Array(elements) => Ok(Node::array(self.nodes(&elements)?)),
            Ir::Hash(pairs) => self.hash(&pairs),
            Ir::Range {
                low,
                high,
                exclusive,
            } => self.range(low, high, exclusive),

            Ir::GlobalVar(name) => Ok(Node::global(name)?),
            Ir::LocalVar(name) | Ir::VCall(name) => Ok(Node::var(name)?),
            Ir::InstanceVar(name) => Ok(assignments::this_property(name)?),
            Ir::Const(name) => Ok(Node::id(name)?),

            Ir::Call {
                receiver,
                name,
                args,
            } => self.call(sexp, receiver, name, &args),

            Ir::LocalAssign { name, value } => self.assignment(Node::var(name)?, value),
            Ir::GlobalAssign { name, value } => self.assignment(Node::global(name)?, value),
            Ir::InstanceAssign { name, value } => {
                self.assignment(assignments::this_property(name)?, value)
            }
            Ir::ConstDecl { name, value } => self.constant_declaration(name, value),
            Ir::MultiAssign { targets, value } => self.multiple_assignment(sexp, targets, value),

            Ir::If {
                condition,
                then_branch,
                else_branch,
            } => self.conditional(condition, then_branch, else_branch),
            Ir::While {
                condition,
                body,
                negated,
            } => self.while_loop(condition, body, negated),
            Ir::For {
                iterable,
                vars,
                body,
            } => self.for_loop(sexp, iterable, vars, body),
            Ir::Iter { call, params, body } => self.iterator_block(sexp, call, params, body),
            Ir::Return(value) => Ok(Node::ret(self.optional(value)?)),
            Ir::Break => Ok(Node::Break),
            Ir::Next => Ok(Node::Continue),
            Ir::Block(statements) => Ok(Node::block(self.statements(&statements)?)),
            Ir::Scope(body) => match body {
                Some(body) => self.node(body),
                None => Ok(Node::block(Vec::new())),
            },
            Ir::Begin(expr) => self.node(expr),

            Ir::Defn { name, args, scope } => {
                Ok(Node::Function(self.function_definition(name, args, scope)?))
            }
            Ir::Class {
                name,
                parent,
                scope,
            } => self.class_definition(name, parent, scope),
            Ir::Module { name, scope } => self.module_definition(name, scope),

            Ir::And(lhs, rhs) => self.logical(lhs, BinaryOp::And, rhs),
            Ir::Or(lhs, rhs) => self.logical(lhs, BinaryOp::Or, rhs),
            Ir::Not(expr) => Ok(Node::not(self.node(expr)?)),
            Ir::Match { pattern, subject } => {
                let pattern = self.node(pattern)?;
                let subject = self.node(subject)?;
                Ok(Node::pattern_match(pattern, subject))
            }
        }
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    fn nodes(&mut self, sexps: &[&'a Sexp]) -> Result<Vec<Node>, TransduceError> {
        sexps.iter().map(|&sexp| self.node(sexp)).collect()
    }

    fn optional(&mut self, sexp: Option<&'a Sexp>) -> Result<Option<Node>, TransduceError> {
        sexp.map(|sexp| self.node(sexp)).transpose()
    }

    /// Statement list; nested blocks are spliced in place.
    fn statements(&mut self, sexps: &[&'a Sexp]) -> Result<Vec<Node>, TransduceError> {
        let mut statements = Vec::with_capacity(sexps.len());
        for &sexp in sexps {
            match self.node(sexp)? {
                Node::Block(block) => statements.extend(block.statements),
                statement => statements.push(statement),
            }
        }
        Ok(statements)
    }

    fn branch(&mut self, sexp: Option<&'a Sexp>) -> Result<Option<Block>, TransduceError> {
        Ok(self.optional(sexp)?.map(Block::wrap))
    }

    fn logical(
        &mut self,
        lhs: &'a Sexp,
        op: BinaryOp,
        rhs: &'a Sexp,
    ) -> Result<Node, TransduceError> {
        let lhs = self.node(lhs)?;
        let rhs = self.node(rhs)?;
        Ok(Node::binary(lhs, op, rhs))
    }

    /// Enter a `(scope ...)` node and pass its statements to `body`.
    ///
    /// Accepts `(scope)`, `(scope nil)`, `(scope (block stmt...))` and
    /// `(scope stmt)`.
    fn scope_body<T>(
        &mut self,
        scope: &'a Sexp,
        body: impl FnOnce(&mut Self, Vec<&'a Sexp>) -> Result<T, TransduceError>,
    ) -> Result<T, TransduceError> {
        if !scope.is("scope") {
            return Err(self.reject_child(scope, "expected node(scope)"));
        }
        self.path.push(&scope.tag);
        let result = match scope.fields.as_slice() {
            [] | [Field::Scalar(Scalar::Nil)] => body(self, Vec::new()),
            [Field::Node(block)] if block.is("block") => {
                self.path.push(&block.tag);
                let statements: Result<Vec<&'a Sexp>, TransduceError> = block
                    .fields
                    .iter()
                    .map(|field| {
                        field
                            .as_node()
                            .ok_or_else(|| self.reject(block, "expected only node fields"))
                    })
                    .collect();
                let result = match statements {
                    Ok(statements) => body(self, statements),
                    Err(err) => Err(err),
                };
                self.path.pop();
                result
            }
            [Field::Node(statement)] => body(self, vec![statement]),
            _ => Err(self.reject(scope, "expected at most 1 node field")),
        };
        self.path.pop();
        result
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn location(&self) -> String {
        self.path.join(" > ")
    }

    /// Reject the node currently being lowered.
    fn reject(&self, sexp: &Sexp, reason: impl Into<String>) -> TransduceError {
        self.unsupported(sexp, reason.into(), self.location())
    }

    /// Reject a child of the current node that was inspected without being entered.
    fn reject_child(&self, child: &Sexp, reason: impl Into<String>) -> TransduceError {
        let location = if self.path.is_empty() {
            child.tag.clone()
        } else {
            format!("{} > {}", self.location(), child.tag)
        };
        self.unsupported(child, reason.into(), location)
    }

    fn unsupported(&self, sexp: &Sexp, reason: String, location: String) -> TransduceError {
        debug!(tag = %sexp.tag, reason = %reason, location = %location, "unsupported construct");
        TransduceError::UnsupportedConstruct {
            tag: sexp.tag.clone(),
            shape: sexp.shape(),
            reason,
            location,
        }
    }
}

use phpgen_ir::{Field, Sexp};
use phpgen_syntax::{ForEach, Function, If, Node, Variable, While};

use super::Transducer;
use crate::error::TransduceError;
use crate::shape::Ir;

impl<'a> Transducer<'a> {
    /// An `if` with only an else branch is emitted with the condition negated
    /// and the branch promoted to `then`.
    pub(super) fn conditional(
        &mut self,
        condition: &'a Sexp,
        then_branch: Option<&'a Sexp>,
        else_branch: Option<&'a Sexp>,
    ) -> Result<Node, TransduceError> {
        let condition = self.node(condition)?;
        let (condition, then_branch, else_branch) = match (then_branch, else_branch) {
            (None, Some(otherwise)) => (Node::not(condition), Some(otherwise), None),
            (then_branch, else_branch) => (condition, then_branch, else_branch),
        };
        Ok(Node::If(If {
            condition: Box::new(condition),
            then_branch: self.branch(then_branch)?,
            else_branch: self.branch(else_branch)?,
        }))
    }

    /// `while`, or `until` with the condition negated.
    pub(super) fn while_loop(
        &mut self,
        condition: &'a Sexp,
        body: Option<&'a Sexp>,
        negated: bool,
    ) -> Result<Node, TransduceError> {
        let mut condition = self.node(condition)?;
        if negated {
            condition = Node::not(condition);
        }
        Ok(Node::While(While {
            condition: Box::new(condition),
            body: self.branch(body)?.unwrap_or_default(),
        }))
    }

    /// `for x in xs` and `for k, v in xs`.
    pub(super) fn for_loop(
        &mut self,
        sexp: &'a Sexp,
        iterable: &'a Sexp,
        vars: &'a Sexp,
        body: Option<&'a Sexp>,
    ) -> Result<Node, TransduceError> {
        let iterable = self.node(iterable)?;
        let variables = self.loop_variables(vars)?;
        self.foreach(sexp, iterable, variables, body)
    }

    /// A call with an attached block. Recognized forms:
    /// - `lambda { |x| ... }`, `proc { ... }`, `Proc.new { ... }` - anonymous function
    /// - `xs.each { |x| ... }`, `h.each_pair { |k, v| ... }` - `foreach`
    /// - `loop { ... }` - `while (TRUE)`
    pub(super) fn iterator_block(
        &mut self,
        sexp: &'a Sexp,
        call: &'a Sexp,
        params: Option<&'a Sexp>,
        body: Option<&'a Sexp>,
    ) -> Result<Node, TransduceError> {
        let Ok(Ir::Call {
            receiver,
            name,
            args,
        }) = Ir::decode(call)
        else {
            return Err(self.reject_child(call, "expected a method call before the block"));
        };
        if !args.is_empty() {
            return Err(self.reject(sexp, format!("block passed to `{name}` with arguments")));
        }
        match (receiver, name) {
            (None, "lambda" | "proc") => self.closure(params, body),
            (Some(receiver), "new") if is_constant(receiver, "Proc") => self.closure(params, body),
            (Some(receiver), "each" | "each_pair") => {
                let iterable = self.node(receiver)?;
                let variables = self.block_parameters(params)?;
                self.foreach(sexp, iterable, variables, body)
            }
            (None, "loop") => Ok(Node::While(While {
                condition: Box::new(Node::bool(true)),
                body: self.branch(body)?.unwrap_or_default(),
            })),
            _ => Err(self.reject(sexp, format!("block passed to `{name}` has no PHP equivalent"))),
        }
    }

    fn closure(
        &mut self,
        params: Option<&'a Sexp>,
        body: Option<&'a Sexp>,
    ) -> Result<Node, TransduceError> {
        let parameters = self.block_parameters(params)?;
        let body = match body {
            Some(body) if is_nil(body) => None,
            other => self.branch(other)?,
        };
        Ok(Node::Function(Function::new(None, parameters, body)))
    }

    /// One loop variable binds the value; two bind key and value.
    fn foreach(
        &mut self,
        sexp: &'a Sexp,
        iterable: Node,
        variables: Vec<Variable>,
        body: Option<&'a Sexp>,
    ) -> Result<Node, TransduceError> {
        let count = variables.len();
        let mut variables = variables.into_iter();
        let (key, value) = match (variables.next(), variables.next()) {
            (Some(value), None) => (None, value),
            (Some(key), Some(value)) if count == 2 => (Some(key), value),
            _ => {
                return Err(self.reject(
                    sexp,
                    format!("foreach takes 1 or 2 loop variables, found {count}"),
                ));
            }
        };
        Ok(Node::ForEach(ForEach {
            iterable: Box::new(iterable),
            key,
            value,
            body: self.branch(body)?.unwrap_or_default(),
        }))
    }

    /// Parameters of an iterator block: none, `(args ...)`, a single
    /// `lasgn`/`dasgn_curr`, or a `masgn` of several.
    fn block_parameters(&mut self, params: Option<&'a Sexp>) -> Result<Vec<Variable>, TransduceError> {
        match params {
            None => Ok(Vec::new()),
            Some(args) if args.is("args") => self.parameters(args),
            Some(vars) => self.loop_variables(vars),
        }
    }

    /// Variables bound by a loop: a single target or a `masgn` of targets.
    fn loop_variables(&mut self, vars: &'a Sexp) -> Result<Vec<Variable>, TransduceError> {
        let mut targets = Vec::new();
        if vars.is("masgn") {
            let Some(Field::Node(list)) = vars.fields.first() else {
                return Err(self.reject_child(vars, "expected node(array) as field 1"));
            };
            self.assignment_targets(list, &mut targets)?;
        } else {
            targets.push(self.node(vars)?);
        }
        targets
            .into_iter()
            .map(|target| match target {
                Node::Variable(variable) => Ok(variable),
                other => Err(self.reject_child(
                    vars,
                    format!("loop variable must be a variable, found {}", other.kind_name()),
                )),
            })
            .collect()
    }
}

fn is_constant(sexp: &Sexp, name: &str) -> bool {
    sexp.is("const")
        && matches!(sexp.fields.first(), Some(Field::Scalar(scalar)) if scalar.as_name() == Some(name))
}

fn is_nil(sexp: &Sexp) -> bool {
    sexp.is("nil") && sexp.fields.is_empty()
}


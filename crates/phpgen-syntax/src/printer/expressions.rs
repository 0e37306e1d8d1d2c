use super::Printer;
use crate::ast::{FunctionCall, Literal, Method, MethodCall, Node, Operator, Variable};
use crate::error::SyntaxError;
use crate::operator::{BinaryOp, UnaryOp};

impl Printer {
    // =========================================================================
    // Variables
    // =========================================================================

    pub(super) fn emit_variable(&mut self, variable: &Variable) {
        if let Some(inner) = variable.indirect() {
            self.write_char('$');
            self.emit_variable(inner);
            return;
        }
        let Some(name) = variable.name() else {
            return;
        };
        if variable.is_global() {
            self.write("$GLOBALS['");
            self.write(name.as_str());
            self.write("']");
        } else {
            self.write_char('$');
            self.write(name.as_str());
        }
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub(super) fn emit_operator(&mut self, operator: &Operator) -> Result<(), SyntaxError> {
        match operator {
            Operator::Unary {
                op: UnaryOp::Execution,
                operand,
            } => {
                let Node::Literal(Literal::String(command)) = operand.as_ref() else {
                    return Err(SyntaxError::MalformedOperand {
                        context: "shell execution operator",
                        expected: "string literal",
                        found: operand.kind_name(),
                    });
                };
                self.write_char('`');
                self.write(&command.replace('`', "\\`"));
                self.write_char('`');
                Ok(())
            }
            Operator::Unary { op, operand } => {
                let symbol = op.symbol();
                self.write(symbol);
                // `- -$x` negates twice; `--$x` would decrement.
                if leading_sign(operand).is_some_and(|sign| symbol.starts_with(sign)) {
                    self.write_char(' ');
                }
                self.emit(operand)
            }
            Operator::Binary {
                op: BinaryOp::Match,
                lhs,
                rhs,
            } => {
                self.write(BinaryOp::Match.symbol());
                self.write_char('(');
                self.emit(lhs)?;
                self.write(", ");
                self.emit(rhs)?;
                self.write_char(')');
                Ok(())
            }
            Operator::Binary { op, lhs, rhs } => {
                self.emit(lhs)?;
                self.write_char(' ');
                self.write(op.symbol());
                self.write_char(' ');
                self.emit(rhs)
            }
        }
    }

    // =========================================================================
    // Calls
    // =========================================================================

    pub(super) fn emit_function_call(&mut self, call: &FunctionCall) -> Result<(), SyntaxError> {
        self.write(call.function.as_str());
        self.write_char('(');
        self.emit_comma_list(&call.arguments)?;
        self.write_char(')');
        Ok(())
    }

    pub(super) fn emit_method_call(&mut self, call: &MethodCall) -> Result<(), SyntaxError> {
        match &call.method {
            Method::New => {
                self.write("new ");
                self.emit(&call.receiver)?;
                if !call.arguments.is_empty() {
                    self.write_char('(');
                    self.emit_comma_list(&call.arguments)?;
                    self.write_char(')');
                }
                Ok(())
            }
            Method::Index => self.emit_index(call),
            Method::Named(name) => {
                self.emit(&call.receiver)?;
                self.write("->");
                self.write(name.as_str());
                self.write_char('(');
                self.emit_comma_list(&call.arguments)?;
                self.write_char(')');
                Ok(())
            }
        }
    }

    /// `$recv->name` for an identifier key, `$recv[key]` for scalar literal
    /// and expression keys.
    fn emit_index(&mut self, call: &MethodCall) -> Result<(), SyntaxError> {
        let [key] = call.arguments.as_slice() else {
            return Err(SyntaxError::MalformedOperand {
                context: "index access",
                expected: "exactly one key",
                found: if call.arguments.is_empty() {
                    "no arguments"
                } else {
                    "several arguments"
                },
            });
        };

        if let Node::Identifier(name) = key {
            self.emit(&call.receiver)?;
            self.write("->");
            self.write(name.as_str());
            return Ok(());
        }

        if let Node::Literal(
            literal @ (Literal::Array(_) | Literal::Hash(_) | Literal::Range { .. } | Literal::Regex { .. }),
        ) = key
        {
            return Err(SyntaxError::MalformedOperand {
                context: "index access",
                expected: "scalar key",
                found: literal.kind_name(),
            });
        }

        self.emit(&call.receiver)?;
        self.write_char('[');
        self.emit(key)?;
        self.write_char(']');
        Ok(())
    }
}

/// The `+` or `-` a node's rendering starts with, if any.
fn leading_sign(node: &Node) -> Option<char> {
    match node {
        Node::Literal(Literal::Integer(value)) if *value < 0 && *value != i64::MIN => Some('-'),
        Node::Literal(Literal::Float(value)) if value.is_sign_negative() && !value.is_nan() => {
            Some('-')
        }
        Node::Operator(Operator::Unary { op: UnaryOp::Negate, .. }) => Some('-'),
        Node::Operator(Operator::Unary { op: UnaryOp::Plus, .. }) => Some('+'),
        Node::Operator(Operator::Binary { op, lhs, .. }) if *op != BinaryOp::Match => {
            leading_sign(lhs)
        }
        _ => None,
    }
}

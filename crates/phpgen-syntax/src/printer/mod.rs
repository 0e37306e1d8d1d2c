//! PHP printer.
//!
//! Walks a `Node` tree and appends PHP text to an output buffer. Rendering is
//! plain recursive string assembly: each node writes fixed punctuation and
//! keywords around the renderings of its children. There is no
//! precedence-aware parenthesisation; nested binary operators print flat as
//! `lhs op rhs`.
//!
//! Split across files by construct family:
//! - `literals.rs` - scalar and compound literals, string escaping
//! - `expressions.rs` - variables, operators, calls
//! - `statements.rs` - functions, classes, control flow, blocks

mod expressions;
mod literals;
mod statements;

use crate::ast::{Node, Program};
use crate::error::SyntaxError;

/// Fixed header every program starts with.
pub const PROGRAM_HEADER: &str = "<?php\n";

/// Rendering recurses once per node level; past this much remaining stack it
/// moves to a new segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

pub struct Printer {
    out: String,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub const fn new() -> Self {
        Self { out: String::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
        }
    }

    /// Render a single node.
    pub fn emit_to_string(node: &Node) -> Result<String, SyntaxError> {
        let mut printer = Self::new();
        printer.emit(node)?;
        Ok(printer.finish())
    }

    /// Render a whole program, header included.
    pub fn program_to_string(program: &Program) -> Result<String, SyntaxError> {
        let mut printer = Self::with_capacity(PROGRAM_HEADER.len() + program.statements.len() * 32);
        printer.emit_program(program)?;
        Ok(printer.finish())
    }

    pub fn finish(self) -> String {
        self.out
    }

    /// `<?php` header, then one terminated statement per line.
    pub fn emit_program(&mut self, program: &Program) -> Result<(), SyntaxError> {
        self.write(PROGRAM_HEADER);
        for (i, statement) in program.statements.iter().enumerate() {
            if i > 0 {
                self.write_char('\n');
            }
            self.emit(statement)?;
            self.write_char(';');
        }
        if !program.is_empty() {
            self.write_char('\n');
        }
        Ok(())
    }

    pub fn emit(&mut self, node: &Node) -> Result<(), SyntaxError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.emit_node(node))
    }

    fn emit_node(&mut self, node: &Node) -> Result<(), SyntaxError> {
        match node {
            Node::Literal(literal) => self.emit_literal(literal),
            Node::Identifier(identifier) => {
                self.write(identifier.as_str());
                Ok(())
            }
            Node::Variable(variable) => {
                self.emit_variable(variable);
                Ok(())
            }
            Node::Operator(operator) => self.emit_operator(operator),
            Node::Function(function) => self.emit_function(function),
            Node::FunctionCall(call) => self.emit_function_call(call),
            Node::MethodCall(call) => self.emit_method_call(call),
            Node::Class(class) => self.emit_class(class),
            Node::Interface(interface) => {
                self.write("interface ");
                self.write(interface.name.as_str());
                self.write(" {}");
                Ok(())
            }
            Node::Block(block) => self.emit_block(Some(block)),
            Node::If(stmt) => self.emit_if(stmt),
            Node::Return(value) => self.emit_return(value.as_deref()),
            Node::While(stmt) => self.emit_while(stmt),
            Node::ForEach(stmt) => self.emit_foreach(stmt),
            Node::Break => {
                self.write("break");
                Ok(())
            }
            Node::Continue => {
                self.write("continue");
                Ok(())
            }
        }
    }

    /// Comma-separated renderings.
    fn emit_comma_list(&mut self, nodes: &[Node]) -> Result<(), SyntaxError> {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit(node)?;
        }
        Ok(())
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn write_char(&mut self, ch: char) {
        self.out.push(ch);
    }
}

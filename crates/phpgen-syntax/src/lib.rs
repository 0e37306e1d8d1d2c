//! PHP syntax tree and printer for the phpgen PHP generator.
//!
//! This crate provides the output side of the pipeline:
//! - `Node` - the closed set of PHP constructs the generator can produce
//! - `Program` - the root container with the `<?php` header
//! - `Printer` - renders nodes and programs to PHP source text
//!
//! Nodes are built bottom-up and own their children. Names are validated at
//! construction time (`SyntaxError::InvalidName`); operand kinds that only
//! matter for a particular rendering are checked by the printer
//! (`SyntaxError::MalformedOperand`).

pub mod error;
pub use error::SyntaxError;

// Operators and their fixed symbols
pub mod operator;
pub use operator::{BinaryOp, OperatorKind, UnaryOp};

// Node model
pub mod ast;
pub use ast::{
    Block, Class, ForEach, Function, FunctionCall, Identifier, If, Interface, Literal, Method,
    MethodCall, Node, Operator, Program, Variable, While,
};
#[cfg(test)]
#[path = "tests/ast_tests.rs"]
mod ast_tests;

// Text rendering
pub mod printer;
pub use printer::Printer;
#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod printer_tests;

//! Transducer from tagged IR to the PHP syntax tree.
//!
//! Two steps per IR node:
//! 1. `Ir::decode` checks the node's tag and field shape and produces a
//!    variant of the closed `Ir` union (unknown tags and wrong arities stop
//!    here with `UnsupportedConstruct`).
//! 2. `Transducer` matches exhaustively on `Ir` and builds the `Node`.
//!
//! Transduction is pure: the same IR always yields the same tree, and no
//! state survives between calls.

pub mod error;
pub use error::TransduceError;

pub mod limits;

// Closed union of supported IR shapes
pub mod shape;
pub use shape::{Ir, ShapeError};
#[cfg(test)]
#[path = "tests/shape_tests.rs"]
mod shape_tests;

// Method-name to operator table
pub mod operators;
pub use operators::{RubyOperator, operator_for};

// Transduction rules
pub mod transducer;
pub use transducer::{Transducer, transduce, transduce_program};
#[cfg(test)]
#[path = "tests/transducer_tests.rs"]
mod transducer_tests;

//! Tagged intermediate representation for the phpgen PHP generator.
//!
//! This crate owns the input side of the pipeline:
//! - `Sexp`, `Field`, `Scalar` - the raw tagged IR tree
//! - `read_sexps` - reader for the s-expression text notation
//! - `from_json` - reader for the JSON notation
//! - `Frontend` - the seam every IR producer implements
//!
//! The vocabulary of tags is deliberately not encoded here. Which tags exist
//! and what their fields mean is decided by the transducer.

pub mod error;
pub use error::ReadError;

// Raw IR tree
pub mod sexp;
pub use sexp::{Field, Scalar, Sexp};

// Text notation: `(call nil :foo (arglist))` or `s(:call, nil, :foo, s(:arglist))`
pub mod reader;
pub use reader::{MAX_READ_DEPTH, read_one, read_sexps};
#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod reader_tests;

// JSON notation: `["call", null, {"symbol": "foo"}, ["arglist"]]`
pub mod json;
pub use json::from_json;
#[cfg(test)]
#[path = "tests/json_tests.rs"]
mod json_tests;

// Front-end seam
pub mod frontend;
pub use frontend::{Frontend, JsonReader, SexpReader};

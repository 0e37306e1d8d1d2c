//! phpgen: generate PHP source from a tagged intermediate representation.
//!
//! The pipeline lives in three workspace crates:
//! - `phpgen_ir` reads IR text into `Sexp` trees
//! - `phpgen_transducer` lowers those trees to PHP syntax nodes
//! - `phpgen_syntax` owns the node model and renders PHP text
//!
//! This crate ties them together (`driver`), runs the result through a real
//! interpreter (`exec`), and carries the configuration, logging and CLI layers.

pub use phpgen_ir as ir;
pub use phpgen_syntax as syntax;
pub use phpgen_transducer as transducer;

pub mod error;
pub use error::Error;

pub mod exec;
pub use exec::{ExecError, ExecOptions, Interpreter, PhpProcess};

pub mod config;
pub use config::{Config, InputFormat};

pub mod driver;
pub use driver::{IrSource, dump, execute, generate, php_version, to_text};

pub mod tracing_config;

pub mod cli;

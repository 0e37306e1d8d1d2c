//! Front-end seam.
//!
//! Anything that can turn source text into IR nodes implements `Frontend`.
//! The two readers in this crate cover the textual IR notations; a real
//! language front-end plugs in the same way.

use crate::error::ReadError;
use crate::json::from_json;
use crate::reader::read_sexps;
use crate::sexp::Sexp;

pub trait Frontend {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Produce the top-level IR nodes for `source`, in order.
    fn read(&self, source: &str) -> Result<Vec<Sexp>, ReadError>;
}

/// Reads the s-expression notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SexpReader;

impl Frontend for SexpReader {
    fn name(&self) -> &'static str {
        "sexp"
    }

    fn read(&self, source: &str) -> Result<Vec<Sexp>, ReadError> {
        read_sexps(source)
    }
}

/// Reads the JSON notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl Frontend for JsonReader {
    fn name(&self) -> &'static str {
        "json"
    }

    fn read(&self, source: &str) -> Result<Vec<Sexp>, ReadError> {
        from_json(source)
    }
}

//! Raw IR tree.
//!
//! A `Sexp` is the untyped record a front-end hands over: a tag and an
//! ordered list of fields, each of which is either a nested node or a scalar.
//! Nodes own their children exclusively; the tree has no sharing.

use std::fmt;

/// A tagged IR node.
#[derive(Debug, Clone, PartialEq)]
pub struct Sexp {
    pub tag: String,
    pub fields: Vec<Field>,
}

/// One field of an IR node.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Node(Sexp),
    Scalar(Scalar),
}

/// Scalar field values.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Interned name: method names, variable names, constant names.
    Symbol(String),
    Range {
        start: i64,
        end: i64,
        exclusive: bool,
    },
    Regex {
        pattern: String,
        flags: String,
    },
}

impl Sexp {
    pub fn new(tag: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            tag: tag.into(),
            fields,
        }
    }

    /// A node without fields, e.g. `(nil)` or `(arglist)`.
    pub fn leaf(tag: impl Into<String>) -> Self {
        Self::new(tag, Vec::new())
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Describe the field kinds of this node, e.g. `(call node(lvar) symbol node(arglist))`.
    ///
    /// Used in diagnostics to report a shape that did not match what a tag expects.
    pub fn shape(&self) -> String {
        let mut out = String::with_capacity(16 + self.fields.len() * 8);
        out.push('(');
        out.push_str(&self.tag);
        for field in &self.fields {
            out.push(' ');
            match field {
                Field::Node(node) => {
                    out.push_str("node(");
                    out.push_str(&node.tag);
                    out.push(')');
                }
                Field::Scalar(scalar) => out.push_str(scalar.kind_name()),
            }
        }
        out.push(')');
        out
    }
}

impl Field {
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Symbol(name.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    pub const fn nil() -> Self {
        Self::Scalar(Scalar::Nil)
    }

    pub const fn as_node(&self) -> Option<&Sexp> {
        match self {
            Self::Node(node) => Some(node),
            Self::Scalar(_) => None,
        }
    }

    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            Self::Node(_) => None,
        }
    }

    /// `nil` in field position marks an absent optional field.
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Nil))
    }
}

impl Scalar {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Range { .. } => "range",
            Self::Regex { .. } => "regex",
        }
    }

    /// Name carried by a symbol or string scalar.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) | Self::String(name) => Some(name),
            _ => None,
        }
    }
}

impl From<Sexp> for Field {
    fn from(node: Sexp) -> Self {
        Self::Node(node)
    }
}

impl From<Scalar> for Field {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.tag)?;
        for field in &self.fields {
            write!(f, " {field}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => node.fmt(f),
            Self::Scalar(scalar) => scalar.fmt(f),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::String(value) => {
                f.write_str("\"")?;
                for ch in value.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Self::Symbol(name) => write!(f, ":{name}"),
            Self::Range {
                start,
                end,
                exclusive,
            } => {
                let dots = if *exclusive { "..." } else { ".." };
                write!(f, "{start}{dots}{end}")
            }
            Self::Regex { pattern, flags } => write!(f, "/{pattern}/{flags}"),
        }
    }
}

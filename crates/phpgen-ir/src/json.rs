//! Reader for the JSON notation of the IR.
//!
//! A node is a JSON array whose first element is the tag:
//!
//! ```json
//! ["call", null, {"symbol": "puts"}, ["arglist", ["str", "hi"]]]
//! ```
//!
//! Plain JSON scalars map onto `Scalar` directly. Scalars JSON cannot express
//! are written as single-key objects: `{"symbol": "foo"}`,
//! `{"range": [1, 10], "exclusive": true}`, `{"regex": "a+", "flags": "i"}`.

use serde_json::{Map, Value};

use crate::error::ReadError;
use crate::sexp::{Field, Scalar, Sexp};

/// Read a document holding either one node or an array of nodes.
pub fn from_json(text: &str) -> Result<Vec<Sexp>, ReadError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = &value else {
        return Err(invalid("top-level value must be an array"));
    };
    if items.first().is_some_and(Value::is_string) {
        return Ok(vec![node_from_value(&value)?]);
    }
    items.iter().map(node_from_value).collect()
}

fn invalid(reason: impl Into<String>) -> ReadError {
    ReadError::InvalidJsonNode {
        reason: reason.into(),
    }
}

fn node_from_value(value: &Value) -> Result<Sexp, ReadError> {
    let Value::Array(items) = value else {
        return Err(invalid(format!("expected a node array, found {value}")));
    };
    let Some((head, rest)) = items.split_first() else {
        return Err(invalid("empty node array has no tag"));
    };
    let Value::String(tag) = head else {
        return Err(invalid(format!("node tag must be a string, found {head}")));
    };
    let fields = rest
        .iter()
        .map(field_from_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Sexp::new(tag.as_str(), fields))
}

fn field_from_value(value: &Value) -> Result<Field, ReadError> {
    let scalar = match value {
        Value::Array(_) => return node_from_value(value).map(Field::Node),
        Value::Null => Scalar::Nil,
        Value::Bool(flag) => Scalar::Bool(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Scalar::Integer(integer),
            None => Scalar::Float(
                number
                    .as_f64()
                    .ok_or_else(|| invalid(format!("unrepresentable number {number}")))?,
            ),
        },
        Value::String(text) => Scalar::String(text.clone()),
        Value::Object(object) => scalar_from_object(object)?,
    };
    Ok(Field::Scalar(scalar))
}

fn scalar_from_object(object: &Map<String, Value>) -> Result<Scalar, ReadError> {
    if let Some(symbol) = object.get("symbol") {
        return symbol
            .as_str()
            .map(|name| Scalar::Symbol(name.to_string()))
            .ok_or_else(|| invalid("`symbol` must be a string"));
    }

    if let Some(range) = object.get("range") {
        let bounds = range
            .as_array()
            .filter(|bounds| bounds.len() == 2)
            .ok_or_else(|| invalid("`range` must be a two-element array"))?;
        let start = bounds[0]
            .as_i64()
            .ok_or_else(|| invalid("range bounds must be integers"))?;
        let end = bounds[1]
            .as_i64()
            .ok_or_else(|| invalid("range bounds must be integers"))?;
        let exclusive = match object.get("exclusive") {
            None => false,
            Some(flag) => flag
                .as_bool()
                .ok_or_else(|| invalid("`exclusive` must be a boolean"))?,
        };
        return Ok(Scalar::Range {
            start,
            end,
            exclusive,
        });
    }

    if let Some(pattern) = object.get("regex") {
        let pattern = pattern
            .as_str()
            .ok_or_else(|| invalid("`regex` must be a string"))?;
        let flags = match object.get("flags") {
            None => "",
            Some(flags) => flags
                .as_str()
                .ok_or_else(|| invalid("`flags` must be a string"))?,
        };
        return Ok(Scalar::Regex {
            pattern: pattern.to_string(),
            flags: flags.to_string(),
        });
    }

    Err(invalid(format!(
        "unknown scalar object with keys {:?}",
        object.keys().collect::<Vec<_>>()
    )))
}

//! Closed union of the IR shapes the transducer understands.
//!
//! `Ir::decode` is the only place that looks at raw tags. It checks the field
//! count and field kinds for the tag and borrows the fields into a typed
//! variant; everything downstream matches on `Ir` exhaustively.

use phpgen_ir::{Field, Scalar, Sexp};

/// A decoded IR node. Borrows its children from the raw `Sexp`.
#[derive(Debug, Clone, PartialEq)]
pub enum Ir<'a> {
    // =========================================================================
    // Literals
    // =========================================================================
    /// `(nil)`
    Nil,
    /// `(true)`
    True,
    /// `(false)`
    False,
    /// `(self)`
    SelfRef,
    /// `(lit <scalar>)`
    Lit(&'a Scalar),
    /// `(str "text")`
    Str(&'a str),
    /// `(xstr "command")`
    XStr(&'a str),
    /// `(dstr "prefix" part...)`
    DStr {
        prefix: &'a str,
        parts: Vec<&'a Sexp>,
    },
    /// `(evstr expr?)`
    EvStr(Option<&'a Sexp>),
    /// `(array elem...)` and `(zarray)`
    Array(Vec<&'a Sexp>),
    /// `(hash key value ...)`
    Hash(Vec<(&'a Sexp, &'a Sexp)>),
    /// `(dot2 lo hi)` and `(dot3 lo hi)`
    Range {
        low: &'a Sexp,
        high: &'a Sexp,
        exclusive: bool,
    },

    // =========================================================================
    // Names
    // =========================================================================
    /// `(gvar :$name)`, sigil stripped.
    GlobalVar(&'a str),
    /// `(lvar :name)` and `(dvar :name)`
    LocalVar(&'a str),
    /// `(ivar :@name)`, sigil stripped.
    InstanceVar(&'a str),
    /// `(const :Name)`
    Const(&'a str),
    /// `(vcall :name)`
    VCall(&'a str),

    // =========================================================================
    // Calls
    // =========================================================================
    /// `(call recv :name args?)`, `(fcall :name args?)`, `(attrasgn recv :name args)`
    Call {
        receiver: Option<&'a Sexp>,
        name: &'a str,
        args: Vec<&'a Sexp>,
    },

    // =========================================================================
    // Assignments
    // =========================================================================
    /// `(lasgn :name value?)`, `(dasgn ...)`, `(dasgn_curr ...)`
    LocalAssign {
        name: &'a str,
        value: Option<&'a Sexp>,
    },
    /// `(gasgn :$name value?)`
    GlobalAssign {
        name: &'a str,
        value: Option<&'a Sexp>,
    },
    /// `(iasgn :@name value?)`
    InstanceAssign {
        name: &'a str,
        value: Option<&'a Sexp>,
    },
    /// `(cdecl :NAME value)`
    ConstDecl { name: &'a str, value: &'a Sexp },
    /// `(masgn (array target...) value?)`
    MultiAssign {
        targets: &'a Sexp,
        value: Option<&'a Sexp>,
    },

    // =========================================================================
    // Control flow
    // =========================================================================
    /// `(if cond then? else?)`
    If {
        condition: &'a Sexp,
        then_branch: Option<&'a Sexp>,
        else_branch: Option<&'a Sexp>,
    },
    /// `(while cond body? true)` and `(until cond body? true)`
    While {
        condition: &'a Sexp,
        body: Option<&'a Sexp>,
        negated: bool,
    },
    /// `(for iterable vars body?)`
    For {
        iterable: &'a Sexp,
        vars: &'a Sexp,
        body: Option<&'a Sexp>,
    },
    /// `(iter call params? body?)`
    Iter {
        call: &'a Sexp,
        params: Option<&'a Sexp>,
        body: Option<&'a Sexp>,
    },
    /// `(return value?)`
    Return(Option<&'a Sexp>),
    /// `(break)`
    Break,
    /// `(next)`
    Next,
    /// `(block stmt...)`
    Block(Vec<&'a Sexp>),
    /// `(scope body?)`
    Scope(Option<&'a Sexp>),
    /// `(begin expr)`
    Begin(&'a Sexp),

    // =========================================================================
    // Definitions
    // =========================================================================
    /// `(defn :name (scope ...))` or `(defn :name (args ...) (scope ...))`
    Defn {
        name: &'a str,
        args: Option<&'a Sexp>,
        scope: &'a Sexp,
    },
    /// `(class :Name parent? (scope ...))`
    Class {
        name: &'a str,
        parent: Option<&'a Sexp>,
        scope: &'a Sexp,
    },
    /// `(module :Name (scope ...))`
    Module { name: &'a str, scope: &'a Sexp },

    // =========================================================================
    // Logic and matching
    // =========================================================================
    /// `(and lhs rhs)`
    And(&'a Sexp, &'a Sexp),
    /// `(or lhs rhs)`
    Or(&'a Sexp, &'a Sexp),
    /// `(not expr)`
    Not(&'a Sexp),
    /// `(match2 pattern subject)` and `(match3 subject pattern)`, normalized.
    Match {
        pattern: &'a Sexp,
        subject: &'a Sexp,
    },
}

/// Why a raw node did not decode. The transducer attaches tag, shape and
/// location when turning this into `TransduceError::UnsupportedConstruct`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    pub reason: String,
}

impl ShapeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

type Decoded<'a> = Result<Ir<'a>, ShapeError>;

impl<'a> Ir<'a> {
    /// Decode a raw node by tag and field shape.
    pub fn decode(sexp: &'a Sexp) -> Decoded<'a> {
        let fields = Fields(sexp);
        match sexp.tag.as_str() {
            "nil" => fields.arity(0).map(|()| Ir::Nil),
            "true" => fields.arity(0).map(|()| Ir::True),
            "false" => fields.arity(0).map(|()| Ir::False),
            "self" => fields.arity(0).map(|()| Ir::SelfRef),
            "lit" => {
                fields.arity(1)?;
                fields.scalar(0).map(Ir::Lit)
            }
            "str" => {
                fields.arity(1)?;
                fields.string(0).map(Ir::Str)
            }
            "xstr" => {
                fields.arity(1)?;
                fields.string(0).map(Ir::XStr)
            }
            "dstr" => {
                fields.at_least(1)?;
                Ok(Ir::DStr {
                    prefix: fields.string(0)?,
                    parts: fields.nodes_from(1)?,
                })
            }
            "evstr" => {
                fields.arity_between(0, 1)?;
                fields.optional_node(0).map(Ir::EvStr)
            }
            "array" => fields.nodes_from(0).map(Ir::Array),
            "zarray" => fields.arity(0).map(|()| Ir::Array(Vec::new())),
            "hash" => decode_hash(&fields),
            "dot2" | "dot3" => {
                fields.arity(2)?;
                Ok(Ir::Range {
                    low: fields.node(0)?,
                    high: fields.node(1)?,
                    exclusive: sexp.is("dot3"),
                })
            }
            "gvar" => {
                fields.arity(1)?;
                fields.name(0).map(|name| Ir::GlobalVar(strip_sigil(name, '$')))
            }
            "lvar" | "dvar" => {
                fields.arity(1)?;
                fields.name(0).map(Ir::LocalVar)
            }
            "ivar" => {
                fields.arity(1)?;
                fields.name(0).map(|name| Ir::InstanceVar(strip_sigil(name, '@')))
            }
            "const" => {
                fields.arity(1)?;
                fields.name(0).map(Ir::Const)
            }
            "vcall" => {
                fields.arity(1)?;
                fields.name(0).map(Ir::VCall)
            }
            "call" => {
                fields.arity_between(2, 3)?;
                Ok(Ir::Call {
                    receiver: fields.optional_node(0)?,
                    name: fields.name(1)?,
                    args: fields.arguments(2)?,
                })
            }
            "fcall" => {
                fields.arity_between(1, 2)?;
                Ok(Ir::Call {
                    receiver: None,
                    name: fields.name(0)?,
                    args: fields.arguments(1)?,
                })
            }
            "attrasgn" => {
                fields.arity_between(2, 3)?;
                Ok(Ir::Call {
                    receiver: Some(fields.node(0)?),
                    name: fields.name(1)?,
                    args: fields.arguments(2)?,
                })
            }
            "lasgn" | "dasgn" | "dasgn_curr" => {
                fields.arity_between(1, 2)?;
                Ok(Ir::LocalAssign {
                    name: fields.name(0)?,
                    value: fields.optional_node(1)?,
                })
            }
            "gasgn" => {
                fields.arity_between(1, 2)?;
                Ok(Ir::GlobalAssign {
                    name: strip_sigil(fields.name(0)?, '$'),
                    value: fields.optional_node(1)?,
                })
            }
            "iasgn" => {
                fields.arity_between(1, 2)?;
                Ok(Ir::InstanceAssign {
                    name: strip_sigil(fields.name(0)?, '@'),
                    value: fields.optional_node(1)?,
                })
            }
            "cdecl" => {
                fields.arity(2)?;
                Ok(Ir::ConstDecl {
                    name: fields.name(0)?,
                    value: fields.node(1)?,
                })
            }
            "masgn" => {
                fields.arity_between(1, 2)?;
                Ok(Ir::MultiAssign {
                    targets: fields.node(0)?,
                    value: fields.optional_node(1)?,
                })
            }
            "if" => {
                fields.arity(3)?;
                Ok(Ir::If {
                    condition: fields.node(0)?,
                    then_branch: fields.optional_node(1)?,
                    else_branch: fields.optional_node(2)?,
                })
            }
            "while" | "until" => decode_loop(&fields, sexp.is("until")),
            "for" => {
                fields.arity_between(2, 3)?;
                Ok(Ir::For {
                    iterable: fields.node(0)?,
                    vars: fields.node(1)?,
                    body: fields.optional_node(2)?,
                })
            }
            "iter" => {
                fields.arity_between(1, 3)?;
                Ok(Ir::Iter {
                    call: fields.node(0)?,
                    params: fields.block_params(1)?,
                    body: fields.optional_node(2)?,
                })
            }
            "return" => {
                fields.arity_between(0, 1)?;
                fields.optional_node(0).map(Ir::Return)
            }
            "break" => fields.no_value().map(|()| Ir::Break),
            "next" => fields.no_value().map(|()| Ir::Next),
            "block" => fields.nodes_from(0).map(Ir::Block),
            "scope" => {
                fields.arity_between(0, 1)?;
                fields.optional_node(0).map(Ir::Scope)
            }
            "begin" => {
                fields.arity(1)?;
                fields.node(0).map(Ir::Begin)
            }
            "defn" => decode_defn(&fields),
            "class" => {
                fields.arity(3)?;
                Ok(Ir::Class {
                    name: fields.name(0)?,
                    parent: fields.optional_node(1)?,
                    scope: fields.node(2)?,
                })
            }
            "module" => {
                fields.arity(2)?;
                Ok(Ir::Module {
                    name: fields.name(0)?,
                    scope: fields.node(1)?,
                })
            }
            "and" => {
                fields.arity(2)?;
                Ok(Ir::And(fields.node(0)?, fields.node(1)?))
            }
            "or" => {
                fields.arity(2)?;
                Ok(Ir::Or(fields.node(0)?, fields.node(1)?))
            }
            "not" => {
                fields.arity(1)?;
                fields.node(0).map(Ir::Not)
            }
            "match2" => decode_match(&fields, true),
            "match3" => decode_match(&fields, false),
            _ => Err(ShapeError::new("unknown tag")),
        }
    }
}

/// `match2` is written (pattern, subject) and `match3` (subject, pattern),
/// but a regex literal on either side is always the pattern.
fn decode_match<'a>(fields: &Fields<'a>, pattern_first: bool) -> Decoded<'a> {
    fields.arity(2)?;
    let (first, second) = (fields.node(0)?, fields.node(1)?);
    let pattern_first = if is_regex_literal(first) {
        true
    } else if is_regex_literal(second) {
        false
    } else {
        pattern_first
    };
    Ok(if pattern_first {
        Ir::Match { pattern: first, subject: second }
    } else {
        Ir::Match { pattern: second, subject: first }
    })
}

/// `(lit /re/)`.
pub(crate) fn is_regex_literal(sexp: &Sexp) -> bool {
    sexp.is("lit") && matches!(sexp.fields.as_slice(), [Field::Scalar(Scalar::Regex { .. })])
}

fn decode_hash<'a>(fields: &Fields<'a>) -> Decoded<'a> {
    let items = fields.nodes_from(0)?;
    if items.len() % 2 != 0 {
        return Err(ShapeError::new(format!(
            "expected an even number of fields, found {}",
            items.len()
        )));
    }
    Ok(Ir::Hash(
        items.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect(),
    ))
}

fn decode_loop<'a>(fields: &Fields<'a>, negated: bool) -> Decoded<'a> {
    fields.arity(3)?;
    // The third field distinguishes `while` (true) from `begin ... end while` (false).
    match fields.0.field(2) {
        Some(Field::Scalar(Scalar::Bool(true))) => {}
        Some(Field::Scalar(Scalar::Bool(false))) => {
            return Err(ShapeError::new("post-condition loops are not supported"));
        }
        _ => return Err(ShapeError::new("expected true or false as field 3")),
    }
    Ok(Ir::While {
        condition: fields.node(0)?,
        body: fields.optional_node(1)?,
        negated,
    })
}

fn decode_defn<'a>(fields: &Fields<'a>) -> Decoded<'a> {
    fields.arity_between(2, 3)?;
    let name = fields.name(0)?;
    if fields.0.arity() == 2 {
        return Ok(Ir::Defn {
            name,
            args: None,
            scope: fields.node(1)?,
        });
    }
    let args = fields.node(1)?;
    if !args.is("args") {
        return Err(ShapeError::new(format!(
            "expected node(args) as field 2, found node({})",
            args.tag
        )));
    }
    Ok(Ir::Defn {
        name,
        args: Some(args),
        scope: fields.node(2)?,
    })
}

fn strip_sigil(name: &str, sigil: char) -> &str {
    name.strip_prefix(sigil).unwrap_or(name)
}

/// Typed field accessors for one raw node. Positions are zero-based; messages
/// report them one-based.
struct Fields<'a>(&'a Sexp);

impl<'a> Fields<'a> {
    fn arity(&self, expected: usize) -> Result<(), ShapeError> {
        self.arity_between(expected, expected)
    }

    fn arity_between(&self, min: usize, max: usize) -> Result<(), ShapeError> {
        let found = self.0.arity();
        if (min..=max).contains(&found) {
            return Ok(());
        }
        let expected = match (min, max) {
            (1, 1) => "1 field".to_string(),
            _ if min == max => format!("{min} fields"),
            _ => format!("{min} to {max} fields"),
        };
        Err(ShapeError::new(format!("expected {expected}, found {found}")))
    }

    fn at_least(&self, min: usize) -> Result<(), ShapeError> {
        let found = self.0.arity();
        if found >= min {
            Ok(())
        } else {
            Err(ShapeError::new(format!(
                "expected at least {min} fields, found {found}"
            )))
        }
    }

    fn describe(field: &Field) -> String {
        match field {
            Field::Node(node) => format!("node({})", node.tag),
            Field::Scalar(scalar) => scalar.kind_name().to_string(),
        }
    }

    fn mismatch(&self, index: usize, expected: &str) -> ShapeError {
        let found = self
            .0
            .field(index)
            .map_or_else(|| "nothing".to_string(), Self::describe);
        ShapeError::new(format!(
            "expected {expected} as field {}, found {found}",
            index + 1
        ))
    }

    fn node(&self, index: usize) -> Result<&'a Sexp, ShapeError> {
        self.0
            .field(index)
            .and_then(Field::as_node)
            .ok_or_else(|| self.mismatch(index, "a node"))
    }

    /// A node, or `nil`/missing for an absent optional field.
    fn optional_node(&self, index: usize) -> Result<Option<&'a Sexp>, ShapeError> {
        match self.0.field(index) {
            None | Some(Field::Scalar(Scalar::Nil)) => Ok(None),
            Some(Field::Node(node)) => Ok(Some(node)),
            Some(Field::Scalar(_)) => Err(self.mismatch(index, "a node or nil")),
        }
    }

    fn scalar(&self, index: usize) -> Result<&'a Scalar, ShapeError> {
        self.0
            .field(index)
            .and_then(Field::as_scalar)
            .ok_or_else(|| self.mismatch(index, "a scalar"))
    }

    fn string(&self, index: usize) -> Result<&'a str, ShapeError> {
        match self.0.field(index) {
            Some(Field::Scalar(Scalar::String(text))) => Ok(text),
            _ => Err(self.mismatch(index, "a string")),
        }
    }

    fn name(&self, index: usize) -> Result<&'a str, ShapeError> {
        self.0
            .field(index)
            .and_then(Field::as_scalar)
            .and_then(Scalar::as_name)
            .ok_or_else(|| self.mismatch(index, "a symbol"))
    }

    fn nodes_from(&self, start: usize) -> Result<Vec<&'a Sexp>, ShapeError> {
        (start..self.0.arity()).map(|index| self.node(index)).collect()
    }

    /// Argument list of a call: `(arglist ...)`, `(array ...)`, nil or missing.
    fn arguments(&self, index: usize) -> Result<Vec<&'a Sexp>, ShapeError> {
        match self.optional_node(index)? {
            None => Ok(Vec::new()),
            Some(list) if list.is("arglist") || list.is("array") => {
                Fields(list).nodes_from(0)
            }
            Some(_) => Err(self.mismatch(index, "node(arglist)")),
        }
    }

    /// Block parameters of an `iter`: absent, nil, `0`, or a node.
    fn block_params(&self, index: usize) -> Result<Option<&'a Sexp>, ShapeError> {
        match self.0.field(index) {
            Some(Field::Scalar(Scalar::Integer(0))) => Ok(None),
            _ => self.optional_node(index),
        }
    }

    /// `break`/`next` carrying a value cannot be expressed in PHP.
    fn no_value(&self) -> Result<(), ShapeError> {
        match self.0.field(0) {
            None | Some(Field::Scalar(Scalar::Nil)) if self.0.arity() <= 1 => Ok(()),
            _ => Err(ShapeError::new("loop jumps with a value are not supported")),
        }
    }
}

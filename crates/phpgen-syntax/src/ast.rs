//! PHP syntax tree.
//!
//! `Node` is a closed sum type: every construct the generator can emit is one
//! of its variants, and the printer matches on it exhaustively. Nodes own
//! their children (a tree, never a graph) and are not mutated after
//! construction.
//!
//! Names go through `Identifier::new`, which enforces PHP's label syntax, so
//! a tree that was built successfully never contains an invalid name.

use crate::error::SyntaxError;
use crate::operator::{BinaryOp, UnaryOp};
use crate::printer::Printer;

/// PHP syntax node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // =========================================================================
    // Expressions
    // =========================================================================
    /// `NULL`, `TRUE`, `42`, `"text"`, `array(...)`, `range(1, 9)`
    Literal(Literal),

    /// Bare name: constants, class names, property names.
    Identifier(Identifier),

    /// `$name`, `$GLOBALS['name']`, `$$name`
    Variable(Variable),

    /// `!x`, `a + b`, `preg_match(p, s)`
    Operator(Operator),

    /// `function name($a) { ... }` or `function($a) { ... }`
    Function(Function),

    /// `name(args)`
    FunctionCall(FunctionCall),

    /// `$recv->name(args)`, `new Recv(args)`, `$recv[key]`, `$recv->key`
    MethodCall(MethodCall),

    // =========================================================================
    // Declarations
    // =========================================================================
    /// `class Name extends Parent { ... }`
    Class(Class),

    /// `interface Name {}`
    Interface(Interface),

    // =========================================================================
    // Statements
    // =========================================================================
    /// `{ a; b; }`
    Block(Block),

    /// `if (cond) { ... } else { ... }`
    If(If),

    /// `return` or `return value`
    Return(Option<Box<Self>>),

    /// `while (cond) { ... }`
    While(While),

    /// `foreach (iterable as $k => $v) { ... }`
    ForEach(ForEach),

    /// `break`
    Break,

    /// `continue`
    Continue,
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// `array(a, b, c)`
    Array(Vec<Node>),
    /// `array(k => v, ...)`, in input order.
    Hash(Vec<(Node, Node)>),
    /// `range(start, end)`; an exclusive range renders `end - 1`.
    Range { start: i64, end: i64, exclusive: bool },
    /// PCRE pattern rendered as a quoted `"/pattern/flags"` string.
    Regex { pattern: String, flags: String },
}

/// A validated PHP label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

/// A PHP variable reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: VariableName,
    global: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum VariableName {
    Plain(Identifier),
    /// Variable-variable: the name is the value of another variable.
    Indirect(Box<Variable>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// `None` for an anonymous function.
    pub name: Option<Identifier>,
    pub parameters: Vec<Variable>,
    /// `None` renders as `{}`.
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function: Identifier,
    pub arguments: Vec<Node>,
}

/// Method selector of a `MethodCall`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Reserved name `new`: instance construction.
    New,
    /// Reserved name `[]`: index or property access.
    Index,
    Named(Identifier),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub receiver: Box<Node>,
    pub method: Method,
    pub arguments: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Identifier,
    pub parent: Option<Identifier>,
    pub members: Vec<Function>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Box<Node>,
    pub then_branch: Option<Block>,
    pub else_branch: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Box<Node>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEach {
    pub iterable: Box<Node>,
    pub key: Option<Variable>,
    pub value: Variable,
    pub body: Block,
}

/// Whole PHP program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Node>,
}

// =========================================================================
// Names
// =========================================================================

impl Identifier {
    pub fn new(name: impl Into<String>) -> Result<Self, SyntaxError> {
        let name = name.into();
        if Self::is_valid(&name) {
            Ok(Self(name))
        } else {
            Err(SyntaxError::InvalidName { name })
        }
    }

    /// PHP label syntax, checked per byte. Every byte of a non-ASCII UTF-8
    /// character is in `0x80..=0xFF` and therefore allowed.
    pub fn is_valid(name: &str) -> bool {
        let bytes = name.as_bytes();
        let Some((&first, rest)) = bytes.split_first() else {
            return false;
        };
        let starts = |b: u8| b.is_ascii_alphabetic() || b == b'_' || b >= 0x7F;
        starts(first) && rest.iter().all(|&b| starts(b) || b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Variable {
    /// `$name`
    pub fn local(name: impl Into<String>) -> Result<Self, SyntaxError> {
        Ok(Self {
            name: VariableName::Plain(Identifier::new(name)?),
            global: false,
        })
    }

    /// `$GLOBALS['name']`
    pub fn global(name: impl Into<String>) -> Result<Self, SyntaxError> {
        Ok(Self {
            name: VariableName::Plain(Identifier::new(name)?),
            global: true,
        })
    }

    /// `$$name`: a variable named by the value of `inner`.
    pub fn of(inner: Self) -> Self {
        Self {
            name: VariableName::Indirect(Box::new(inner)),
            global: false,
        }
    }

    /// `$this`
    pub fn this() -> Self {
        Self {
            name: VariableName::Plain(Identifier("this".to_string())),
            global: false,
        }
    }

    pub const fn is_global(&self) -> bool {
        self.global
    }

    /// The bare name, or `None` for a variable-variable.
    pub fn name(&self) -> Option<&Identifier> {
        match &self.name {
            VariableName::Plain(name) => Some(name),
            VariableName::Indirect(_) => None,
        }
    }

    /// The variable whose value names this one, for a variable-variable.
    pub fn indirect(&self) -> Option<&Self> {
        match &self.name {
            VariableName::Plain(_) => None,
            VariableName::Indirect(inner) => Some(inner),
        }
    }
}

impl Method {
    /// Classify a method name: the reserved `new` and `[]`, or a plain identifier.
    pub fn parse(name: &str) -> Result<Self, SyntaxError> {
        match name {
            "new" => Ok(Self::New),
            "[]" => Ok(Self::Index),
            _ => Identifier::new(name).map(Self::Named),
        }
    }
}

// =========================================================================
// Builder helpers
// =========================================================================

impl Node {
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    pub const fn bool(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    pub const fn int(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    pub const fn float(value: f64) -> Self {
        Self::Literal(Literal::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    pub const fn array(elements: Vec<Self>) -> Self {
        Self::Literal(Literal::Array(elements))
    }

    pub const fn hash(pairs: Vec<(Self, Self)>) -> Self {
        Self::Literal(Literal::Hash(pairs))
    }

    pub const fn range(start: i64, end: i64, exclusive: bool) -> Self {
        Self::Literal(Literal::Range {
            start,
            end,
            exclusive,
        })
    }

    pub fn id(name: impl Into<String>) -> Result<Self, SyntaxError> {
        Identifier::new(name).map(Self::Identifier)
    }

    pub fn var(name: impl Into<String>) -> Result<Self, SyntaxError> {
        Variable::local(name).map(Self::Variable)
    }

    pub fn global(name: impl Into<String>) -> Result<Self, SyntaxError> {
        Variable::global(name).map(Self::Variable)
    }

    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Operator(Operator::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(lhs: Self, op: BinaryOp, rhs: Self) -> Self {
        Self::Operator(Operator::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// `!operand`
    pub fn not(operand: Self) -> Self {
        Self::unary(UnaryOp::Not, operand)
    }

    /// `target = value`
    pub fn assign(target: Self, value: Self) -> Self {
        Self::binary(target, BinaryOp::Assign, value)
    }

    /// `lhs . rhs`
    pub fn concat(lhs: Self, rhs: Self) -> Self {
        Self::binary(lhs, BinaryOp::Concat, rhs)
    }

    /// `preg_match(pattern, subject)`
    pub fn pattern_match(pattern: Self, subject: Self) -> Self {
        Self::binary(pattern, BinaryOp::Match, subject)
    }

    pub fn call(function: impl Into<String>, arguments: Vec<Self>) -> Result<Self, SyntaxError> {
        Ok(Self::FunctionCall(FunctionCall {
            function: Identifier::new(function)?,
            arguments,
        }))
    }

    pub fn method(receiver: Self, method: &str, arguments: Vec<Self>) -> Result<Self, SyntaxError> {
        Ok(Self::MethodCall(MethodCall {
            receiver: Box::new(receiver),
            method: Method::parse(method)?,
            arguments,
        }))
    }

    /// `receiver[key]`, or `receiver->key` for an identifier key.
    pub fn index(receiver: Self, key: Self) -> Self {
        Self::MethodCall(MethodCall {
            receiver: Box::new(receiver),
            method: Method::Index,
            arguments: vec![key],
        })
    }

    pub fn ret(value: Option<Self>) -> Self {
        Self::Return(value.map(Box::new))
    }

    pub fn if_then(condition: Self, then_branch: Option<Self>, else_branch: Option<Self>) -> Self {
        Self::If(If {
            condition: Box::new(condition),
            then_branch: then_branch.map(Block::wrap),
            else_branch: else_branch.map(Block::wrap),
        })
    }

    pub fn while_loop(condition: Self, body: Option<Self>) -> Self {
        Self::While(While {
            condition: Box::new(condition),
            body: body.map(Block::wrap).unwrap_or_default(),
        })
    }

    pub const fn block(statements: Vec<Self>) -> Self {
        Self::Block(Block { statements })
    }

    /// Short description used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal(literal) => literal.kind_name(),
            Self::Identifier(_) => "identifier",
            Self::Variable(_) => "variable",
            Self::Operator(_) => "operator",
            Self::Function(_) => "function",
            Self::FunctionCall(_) => "function call",
            Self::MethodCall(_) => "method call",
            Self::Class(_) => "class",
            Self::Interface(_) => "interface",
            Self::Block(_) => "block",
            Self::If(_) => "if statement",
            Self::Return(_) => "return statement",
            Self::While(_) => "while loop",
            Self::ForEach(_) => "foreach loop",
            Self::Break => "break statement",
            Self::Continue => "continue statement",
        }
    }

    /// Render this node as PHP source text.
    pub fn render(&self) -> Result<String, SyntaxError> {
        Printer::emit_to_string(self)
    }
}

impl Literal {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null literal",
            Self::Bool(_) => "boolean literal",
            Self::Integer(_) => "integer literal",
            Self::Float(_) => "float literal",
            Self::String(_) => "string literal",
            Self::Array(_) => "array literal",
            Self::Hash(_) => "hash literal",
            Self::Range { .. } => "range literal",
            Self::Regex { .. } => "regex literal",
        }
    }
}

impl Function {
    pub const fn new(name: Option<Identifier>, parameters: Vec<Variable>, body: Option<Block>) -> Self {
        Self {
            name,
            parameters,
            body,
        }
    }

    pub const fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl Class {
    pub const fn new(name: Identifier, parent: Option<Identifier>, members: Vec<Function>) -> Self {
        Self {
            name,
            parent,
            members,
        }
    }
}

impl Block {
    pub const fn new(statements: Vec<Node>) -> Self {
        Self { statements }
    }

    /// Return `node` itself when it is already a block, otherwise wrap it.
    pub fn wrap(node: Node) -> Self {
        match node {
            Node::Block(block) => block,
            other => Self {
                statements: vec![other],
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Program {
    pub const fn new(statements: Vec<Node>) -> Self {
        Self { statements }
    }

    pub fn push(&mut self, statement: Node) {
        self.statements.push(statement);
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Render the whole program, header included.
    pub fn render(&self) -> Result<String, SyntaxError> {
        Printer::program_to_string(self)
    }
}

impl From<Identifier> for Node {
    fn from(identifier: Identifier) -> Self {
        Self::Identifier(identifier)
    }
}

impl From<Variable> for Node {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<Function> for Node {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

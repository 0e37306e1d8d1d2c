//! Method names that denote operators.
//!
//! Operator applications arrive as method calls: `a + b` is
//! `(call (lvar :a) :+ (arglist (lvar :b)))` and `-a` is
//! `(call (lvar :a) :-@)`.

use once_cell::sync::Lazy;
use phpgen_syntax::{BinaryOp, UnaryOp};
use rustc_hash::FxHashMap;

/// What an operator method name maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RubyOperator {
    /// Receiver is the operand; takes no arguments.
    Unary(UnaryOp),
    /// Receiver is the left operand; takes exactly one argument.
    Binary(BinaryOp),
    /// `=~`
    Match,
    /// `!~`
    NotMatch,
}

impl RubyOperator {
    /// Number of call arguments the operator takes.
    pub const fn arity(self) -> usize {
        match self {
            Self::Unary(_) => 0,
            Self::Binary(_) | Self::Match | Self::NotMatch => 1,
        }
    }
}

static OPERATORS: Lazy<FxHashMap<&'static str, RubyOperator>> = Lazy::new(|| {
    use RubyOperator::{Binary, Match, NotMatch, Unary};
    [
        ("+", Binary(BinaryOp::Add)),
        ("-", Binary(BinaryOp::Subtract)),
        ("*", Binary(BinaryOp::Multiply)),
        ("/", Binary(BinaryOp::Divide)),
        ("%", Binary(BinaryOp::Modulo)),
        ("**", Binary(BinaryOp::Power)),
        ("&", Binary(BinaryOp::BitAnd)),
        ("|", Binary(BinaryOp::BitOr)),
        ("^", Binary(BinaryOp::BitXor)),
        ("<<", Binary(BinaryOp::ShiftLeft)),
        (">>", Binary(BinaryOp::ShiftRight)),
        ("==", Binary(BinaryOp::Equal)),
        ("!=", Binary(BinaryOp::NotEqual)),
        ("===", Binary(BinaryOp::Identical)),
        ("<", Binary(BinaryOp::Less)),
        (">", Binary(BinaryOp::Greater)),
        ("<=", Binary(BinaryOp::LessEqual)),
        (">=", Binary(BinaryOp::GreaterEqual)),
        ("<=>", Binary(BinaryOp::Spaceship)),
        ("=~", Match),
        ("!~", NotMatch),
        ("!", Unary(UnaryOp::Not)),
        ("-@", Unary(UnaryOp::Negate)),
        ("+@", Unary(UnaryOp::Plus)),
        ("~", Unary(UnaryOp::BitNot)),
    ]
    .into_iter()
    .collect()
});

/// Look up the operator a method name denotes.
pub fn operator_for(method: &str) -> Option<RubyOperator> {
    OPERATORS.get(method).copied()
}

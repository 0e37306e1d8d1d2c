//! PHP operators.
//!
//! Every operator carries a fixed symbol or keyword that the printer writes
//! verbatim. The only operators that do not render infix/prefix are
//! `BinaryOp::Match` (rendered as a `preg_match` call) and
//! `UnaryOp::Execution` (rendered as a backtick-quoted command).

/// Operator category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Arithmetic,
    Bitwise,
    Comparison,
    Logical,
    String,
    Assignment,
    PatternMatch,
    Execution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `!x`
    Not,
    /// `-x`
    Negate,
    /// `+x`
    Plus,
    /// `~x`
    BitNot,
    /// `` `command` ``
    Execution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    Equal,
    NotEqual,
    Identical,
    NotIdentical,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Spaceship,
    And,
    Or,
    Xor,
    Concat,
    Assign,
    /// `preg_match(pattern, subject)`
    Match,
}

impl UnaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Negate => "-",
            Self::Plus => "+",
            Self::BitNot => "~",
            Self::Execution => "`",
        }
    }

    pub const fn kind(self) -> OperatorKind {
        match self {
            Self::Not => OperatorKind::Logical,
            Self::Negate | Self::Plus => OperatorKind::Arithmetic,
            Self::BitNot => OperatorKind::Bitwise,
            Self::Execution => OperatorKind::Execution,
        }
    }
}

impl BinaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Power => "**",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Identical => "===",
            Self::NotIdentical => "!==",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Spaceship => "<=>",
            Self::And => "&&",
            Self::Or => "||",
            Self::Xor => "xor",
            Self::Concat => ".",
            Self::Assign => "=",
            Self::Match => "preg_match",
        }
    }

    pub const fn kind(self) -> OperatorKind {
        match self {
            Self::Add
            | Self::Subtract
            | Self::Multiply
            | Self::Divide
            | Self::Modulo
            | Self::Power => OperatorKind::Arithmetic,
            Self::BitAnd | Self::BitOr | Self::BitXor | Self::ShiftLeft | Self::ShiftRight => {
                OperatorKind::Bitwise
            }
            Self::Equal
            | Self::NotEqual
            | Self::Identical
            | Self::NotIdentical
            | Self::Less
            | Self::Greater
            | Self::LessEqual
            | Self::GreaterEqual
            | Self::Spaceship => OperatorKind::Comparison,
            Self::And | Self::Or | Self::Xor => OperatorKind::Logical,
            Self::Concat => OperatorKind::String,
            Self::Assign => OperatorKind::Assignment,
            Self::Match => OperatorKind::PatternMatch,
        }
    }
}

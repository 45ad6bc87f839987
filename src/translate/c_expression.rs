//! Host-language expressions produced by translation

use serde::Serialize;
use std::fmt;

use crate::ast::{BinaryOperator, Declaration, UnaryOperator};
use crate::error::{Error, Result};
use crate::types::CType;

/// C binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CBinaryOperator {
    LogicalAnd,
    LogicalOr,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl CBinaryOperator {
    /// C operator for a term-level ACSL operator
    ///
    /// Derived operators are desugared before they reach a term, and logical
    /// connectives belong to predicates; both are rejected here.
    pub fn from_logic(op: BinaryOperator) -> Result<Self> {
        Ok(match op {
            BinaryOperator::BAnd => CBinaryOperator::BitAnd,
            BinaryOperator::BOr => CBinaryOperator::BitOr,
            BinaryOperator::BXor => CBinaryOperator::BitXor,
            BinaryOperator::Eq => CBinaryOperator::Eq,
            BinaryOperator::Neq => CBinaryOperator::Ne,
            BinaryOperator::Leq => CBinaryOperator::Le,
            BinaryOperator::Geq => CBinaryOperator::Ge,
            BinaryOperator::Lt => CBinaryOperator::Lt,
            BinaryOperator::Gt => CBinaryOperator::Gt,
            BinaryOperator::Lshift => CBinaryOperator::Shl,
            BinaryOperator::Rshift => CBinaryOperator::Shr,
            BinaryOperator::Plus => CBinaryOperator::Add,
            BinaryOperator::Minus => CBinaryOperator::Sub,
            BinaryOperator::Times => CBinaryOperator::Mul,
            BinaryOperator::Divide => CBinaryOperator::Div,
            BinaryOperator::Mod => CBinaryOperator::Rem,
            other => return Err(Error::invalid_operator(other, "C expression")),
        })
    }

    fn token(self) -> &'static str {
        match self {
            CBinaryOperator::LogicalAnd => "&&",
            CBinaryOperator::LogicalOr => "||",
            CBinaryOperator::BitAnd => "&",
            CBinaryOperator::BitOr => "|",
            CBinaryOperator::BitXor => "^",
            CBinaryOperator::Eq => "==",
            CBinaryOperator::Ne => "!=",
            CBinaryOperator::Le => "<=",
            CBinaryOperator::Ge => ">=",
            CBinaryOperator::Lt => "<",
            CBinaryOperator::Gt => ">",
            CBinaryOperator::Shl => "<<",
            CBinaryOperator::Shr => ">>",
            CBinaryOperator::Add => "+",
            CBinaryOperator::Sub => "-",
            CBinaryOperator::Mul => "*",
            CBinaryOperator::Div => "/",
            CBinaryOperator::Rem => "%",
        }
    }
}

/// C unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CUnaryOperator {
    Plus,
    Minus,
    BitNot,
    LogicalNot,
    AddressOf,
    Deref,
    Sizeof,
}

impl From<UnaryOperator> for CUnaryOperator {
    fn from(op: UnaryOperator) -> Self {
        match op {
            UnaryOperator::Plus => CUnaryOperator::Plus,
            UnaryOperator::Minus => CUnaryOperator::Minus,
            UnaryOperator::BNeg => CUnaryOperator::BitNot,
            UnaryOperator::Address => CUnaryOperator::AddressOf,
            UnaryOperator::Pointer => CUnaryOperator::Deref,
            UnaryOperator::Sizeof => CUnaryOperator::Sizeof,
        }
    }
}

/// A C expression
///
/// Identifier expressions carry the declaration they were resolved to.
/// Variables the translator introduces itself (the return value and
/// pre-state temporaries) are [`CExpression::Variable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CExpression {
    Integer(i128),
    Float(String),
    Char(char),
    Str(String),
    Bool(bool),
    /// Reference to a declared program variable
    Id(Declaration),
    /// Variable synthesized during translation
    Variable {
        name: String,
        ty: CType,
    },
    Subscript {
        array: Box<CExpression>,
        index: Box<CExpression>,
    },
    Binary {
        op: CBinaryOperator,
        left: Box<CExpression>,
        right: Box<CExpression>,
    },
    Unary {
        op: CUnaryOperator,
        operand: Box<CExpression>,
    },
    Cast {
        ty: CType,
        expression: Box<CExpression>,
    },
    /// Call of a declared function
    Call {
        function: Declaration,
        args: Vec<CExpression>,
    },
}

impl CExpression {
    /// `left op right`
    pub fn binary(op: CBinaryOperator, left: CExpression, right: CExpression) -> Self {
        CExpression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `op operand`
    pub fn unary(op: CUnaryOperator, operand: CExpression) -> Self {
        CExpression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// `!operand`
    pub fn not(operand: CExpression) -> Self {
        Self::unary(CUnaryOperator::LogicalNot, operand)
    }

    /// Synthesized variable
    pub fn variable(name: impl Into<String>, ty: CType) -> Self {
        CExpression::Variable {
            name: name.into(),
            ty,
        }
    }

    fn needs_parens(&self, prefix_operand: bool) -> bool {
        match self {
            CExpression::Binary { .. } => true,
            CExpression::Unary { .. } | CExpression::Cast { .. } => prefix_operand,
            CExpression::Integer(n) => prefix_operand && *n < 0,
            CExpression::Float(text) => prefix_operand && text.starts_with('-'),
            _ => false,
        }
    }
}

/// Writes an operand, parenthesized where C precedence requires it
///
/// The flag marks operands of prefix operators and casts, where a nested
/// prefix operator or a negative literal also needs parentheses (`-(-x)`,
/// not `--x`).
struct Operand<'e>(&'e CExpression, bool);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.needs_parens(self.1) {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for CExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CExpression::Integer(n) => write!(f, "{}", n),
            CExpression::Float(text) => write!(f, "{}", text),
            CExpression::Char(c) => write!(f, "'{}'", c.escape_default()),
            CExpression::Str(s) => write!(f, "\"{}\"", s.escape_default()),
            CExpression::Bool(b) => write!(f, "{}", if *b { 1 } else { 0 }),
            CExpression::Id(declaration) => write!(f, "{}", declaration.name()),
            CExpression::Variable { name, .. } => write!(f, "{}", name),
            CExpression::Subscript { array, index } => {
                write!(f, "{}[{}]", Operand(array, true), index)
            }
            CExpression::Binary { op, left, right } => {
                write!(f, "{} {} {}", Operand(left, false), op.token(), Operand(right, false))
            }
            CExpression::Unary {
                op: CUnaryOperator::Sizeof,
                operand,
            } => write!(f, "sizeof({})", operand),
            CExpression::Unary { op, operand } => {
                let token = match op {
                    CUnaryOperator::Plus => "+",
                    CUnaryOperator::Minus => "-",
                    CUnaryOperator::BitNot => "~",
                    CUnaryOperator::LogicalNot => "!",
                    CUnaryOperator::AddressOf => "&",
                    CUnaryOperator::Deref => "*",
                    CUnaryOperator::Sizeof => "sizeof",
                };
                write!(f, "{}{}", token, Operand(operand, true))
            }
            CExpression::Cast { ty, expression } => write!(f, "({}){}", ty, Operand(expression, true)),
            CExpression::Call { function, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", function.name(), args.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> CExpression {
        CExpression::Id(Declaration::Variable {
            name: "x".to_string(),
            ty: CType::int(),
            function_name: Some("f".to_string()),
        })
    }

    #[test]
    fn test_display_parenthesizes_compound_operands() {
        let sum = CExpression::binary(CBinaryOperator::Add, x(), CExpression::Integer(1));
        let cmp = CExpression::binary(CBinaryOperator::Ne, sum, CExpression::Integer(10));
        assert_eq!(cmp.to_string(), "(x + 1) != 10");
        assert_eq!(CExpression::not(cmp).to_string(), "!((x + 1) != 10)");
    }

    #[test]
    fn test_prefix_operator_on_negative_literal() {
        let minus = |e| CExpression::unary(CUnaryOperator::Minus, e);
        assert_eq!(minus(CExpression::Integer(-1)).to_string(), "-(-1)");
        assert_eq!(
            minus(CExpression::Float("-2.5".to_string())).to_string(),
            "-(-2.5)"
        );
        assert_eq!(minus(CExpression::Integer(1)).to_string(), "-1");
        assert_eq!(
            CExpression::binary(CBinaryOperator::Sub, x(), CExpression::Integer(-1)).to_string(),
            "x - -1"
        );
    }

    #[test]
    fn test_operator_mapping() {
        assert_eq!(
            CBinaryOperator::from_logic(BinaryOperator::Neq).unwrap(),
            CBinaryOperator::Ne
        );
        assert!(CBinaryOperator::from_logic(BinaryOperator::And).is_err());
        assert!(CBinaryOperator::from_logic(BinaryOperator::BImp).is_err());
    }
}

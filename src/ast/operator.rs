use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Binary operators of the ACSL logic language
///
/// The set mirrors the operator tokens the annotation converter produces.
/// Logical connectives only appear at predicate level, the rest only inside
/// terms. `BImp` and `BEqv` are derived operators and are desugared when a
/// binary term is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Logical
    /// Logical conjunction (&&)
    And,
    /// Logical disjunction (||)
    Or,
    /// Logical implication (==>)
    Imp,
    /// Logical equivalence (<==>)
    Eqv,
    /// Logical exclusive or (^^)
    Xor,

    // Bitwise
    /// Bitwise and (&)
    BAnd,
    /// Bitwise or (|)
    BOr,
    /// Bitwise implication (-->)
    BImp,
    /// Bitwise equivalence (<-->)
    BEqv,
    /// Bitwise exclusive or (^)
    BXor,

    // Comparison
    /// Equality (==)
    Eq,
    /// Inequality (!=)
    Neq,
    /// Less than or equal (<=)
    Leq,
    /// Greater than or equal (>=)
    Geq,
    /// Less than (<)
    Lt,
    /// Greater than (>)
    Gt,

    // Arithmetic
    /// Left shift (<<)
    Lshift,
    /// Right shift (>>)
    Rshift,
    /// Addition (+)
    Plus,
    /// Subtraction (-)
    Minus,
    /// Multiplication (*)
    Times,
    /// Division (/)
    Divide,
    /// Remainder (%)
    Mod,
}

impl BinaryOperator {
    /// Parse an operator token as emitted by the annotation converter
    pub fn from_token(token: &str) -> Result<Self> {
        Ok(match token {
            "&&" => BinaryOperator::And,
            "||" => BinaryOperator::Or,
            "==>" => BinaryOperator::Imp,
            "<==>" => BinaryOperator::Eqv,
            "^^" => BinaryOperator::Xor,
            "&" => BinaryOperator::BAnd,
            "|" => BinaryOperator::BOr,
            "-->" => BinaryOperator::BImp,
            "<-->" => BinaryOperator::BEqv,
            "^" => BinaryOperator::BXor,
            "==" => BinaryOperator::Eq,
            "!=" => BinaryOperator::Neq,
            "<=" => BinaryOperator::Leq,
            ">=" => BinaryOperator::Geq,
            "<" => BinaryOperator::Lt,
            ">" => BinaryOperator::Gt,
            "<<" => BinaryOperator::Lshift,
            ">>" => BinaryOperator::Rshift,
            "+" => BinaryOperator::Plus,
            "-" => BinaryOperator::Minus,
            "*" => BinaryOperator::Times,
            "/" => BinaryOperator::Divide,
            "%" => BinaryOperator::Mod,
            other => return Err(Error::invalid_operator(other, "operator token")),
        })
    }

    /// Returns true for `&&`, `||`, `==>`, `<==>` and `^^`
    pub fn is_logical(self) -> bool {
        matches!(
            self,
            BinaryOperator::And
                | BinaryOperator::Or
                | BinaryOperator::Imp
                | BinaryOperator::Eqv
                | BinaryOperator::Xor
        )
    }

    /// Returns true for the bitwise operators, including the derived ones
    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOperator::BAnd
                | BinaryOperator::BOr
                | BinaryOperator::BImp
                | BinaryOperator::BEqv
                | BinaryOperator::BXor
        )
    }

    /// Returns true for the six comparison operators
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Neq
                | BinaryOperator::Leq
                | BinaryOperator::Geq
                | BinaryOperator::Lt
                | BinaryOperator::Gt
        )
    }

    /// Returns true for shifts and the four arithmetic operators plus remainder
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOperator::Lshift
                | BinaryOperator::Rshift
                | BinaryOperator::Plus
                | BinaryOperator::Minus
                | BinaryOperator::Times
                | BinaryOperator::Divide
                | BinaryOperator::Mod
        )
    }

    /// Operand order does not matter for these operators
    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            BinaryOperator::And
                | BinaryOperator::Or
                | BinaryOperator::Eqv
                | BinaryOperator::Xor
                | BinaryOperator::Eq
                | BinaryOperator::Neq
                | BinaryOperator::BAnd
                | BinaryOperator::BOr
                | BinaryOperator::BEqv
                | BinaryOperator::BXor
                | BinaryOperator::Plus
                | BinaryOperator::Times
        )
    }

    /// The comparison that holds exactly when `self` does not
    pub fn flip(self) -> Result<Self> {
        Ok(match self {
            BinaryOperator::Eq => BinaryOperator::Neq,
            BinaryOperator::Neq => BinaryOperator::Eq,
            BinaryOperator::Leq => BinaryOperator::Gt,
            BinaryOperator::Gt => BinaryOperator::Leq,
            BinaryOperator::Geq => BinaryOperator::Lt,
            BinaryOperator::Lt => BinaryOperator::Geq,
            other => return Err(Error::invalid_operator(other, "operator flip")),
        })
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let token = match self {
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Imp => "==>",
            BinaryOperator::Eqv => "<==>",
            BinaryOperator::Xor => "^^",
            BinaryOperator::BAnd => "&",
            BinaryOperator::BOr => "|",
            BinaryOperator::BImp => "-->",
            BinaryOperator::BEqv => "<-->",
            BinaryOperator::BXor => "^",
            BinaryOperator::Eq => "==",
            BinaryOperator::Neq => "!=",
            BinaryOperator::Leq => "<=",
            BinaryOperator::Geq => ">=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lshift => "<<",
            BinaryOperator::Rshift => ">>",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Times => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Mod => "%",
        };
        write!(f, "{}", token)
    }
}

/// Unary term operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Unary plus (+)
    Plus,
    /// Arithmetic negation (-)
    Minus,
    /// Bitwise complement (~)
    BNeg,
    /// Address-of (&)
    Address,
    /// Dereference (*)
    Pointer,
    /// Size of the operand's type (sizeof)
    Sizeof,
}

impl UnaryOperator {
    /// Parse a unary operator token
    pub fn from_token(token: &str) -> Result<Self> {
        Ok(match token {
            "+" => UnaryOperator::Plus,
            "-" => UnaryOperator::Minus,
            "~" => UnaryOperator::BNeg,
            "&" => UnaryOperator::Address,
            "*" => UnaryOperator::Pointer,
            "sizeof" => UnaryOperator::Sizeof,
            other => return Err(Error::invalid_operator(other, "unary operator token")),
        })
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Minus => write!(f, "-"),
            UnaryOperator::BNeg => write!(f, "~"),
            UnaryOperator::Address => write!(f, "&"),
            UnaryOperator::Pointer => write!(f, "*"),
            UnaryOperator::Sizeof => write!(f, "sizeof"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_is_involution() {
        for op in [
            BinaryOperator::Eq,
            BinaryOperator::Neq,
            BinaryOperator::Leq,
            BinaryOperator::Geq,
            BinaryOperator::Lt,
            BinaryOperator::Gt,
        ] {
            assert_eq!(op.flip().unwrap().flip().unwrap(), op);
        }
        assert_eq!(BinaryOperator::Leq.flip().unwrap(), BinaryOperator::Gt);
        assert!(BinaryOperator::Plus.flip().is_err());
    }

    #[test]
    fn test_classification_is_partition() {
        let all = [
            "&&", "||", "==>", "<==>", "^^", "&", "|", "-->", "<-->", "^", "==", "!=", "<=",
            ">=", "<", ">", "<<", ">>", "+", "-", "*", "/", "%",
        ];
        for token in all {
            let op = BinaryOperator::from_token(token).unwrap();
            let classes = [
                op.is_logical(),
                op.is_bitwise(),
                op.is_comparison(),
                op.is_arithmetic(),
            ];
            assert_eq!(classes.iter().filter(|c| **c).count(), 1, "{}", token);
            assert_eq!(op.to_string(), token);
        }
        assert!(BinaryOperator::from_token("**").is_err());
    }
}

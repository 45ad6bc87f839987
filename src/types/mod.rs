//! # ACSL Type System
//!
//! Terms in annotations are typed either by a lifted C type (the declared type
//! of a program variable) or by one of the logic types ACSL adds on top of C.
//!
//! ## Logic Types
//!
//! ```text
//! boolean    truth values
//! integer    mathematical (unbounded) integers
//! real       mathematical reals
//! any        element type of the empty set only
//! ```
//!
//! ## Typing Binary Terms
//!
//! Arithmetic and bitwise terms take the *most general* type of their
//! operands. C integral types generalize to `integer`, C floating types to
//! `real`. Typedef names are opaque scalars and generalize the same way.
//!
//! Pointer arithmetic keeps C's rules:
//!
//! ```text
//! T* + integral   -> T*
//! T* - integral   -> T*
//! T* - T*         -> integer
//! T[N] + integral -> T*
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::BinaryOperator;
use crate::error::{Error, Result};

/// Integer kinds of the host language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntKind {
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `long long`
    LongLong,
}

/// Host C types as seen by annotations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CType {
    /// `void`
    Void,
    /// `_Bool`
    Bool,
    /// `char`
    Char {
        /// Whether the char is explicitly unsigned
        unsigned: bool,
    },
    /// Integer types
    Int {
        /// Integer kind
        kind: IntKind,
        /// Whether the type is unsigned
        unsigned: bool,
    },
    /// `float`
    Float,
    /// `double`
    Double,
    /// `long double`
    LongDouble,
    /// Pointer: T*
    Pointer(Box<CType>),
    /// Array: T\[N\]
    Array {
        /// Element type
        element: Box<CType>,
        /// Declared length, if any
        length: Option<u64>,
    },
    /// Struct, union or typedef name
    Named(String),
}

impl CType {
    /// Plain signed `int`
    pub fn int() -> Self {
        CType::Int {
            kind: IntKind::Int,
            unsigned: false,
        }
    }

    /// Returns true for `_Bool`, `char` and integer types
    pub fn is_integral(&self) -> bool {
        matches!(self, CType::Bool | CType::Char { .. } | CType::Int { .. })
    }

    /// Returns true for the three floating types
    pub fn is_floating(&self) -> bool {
        matches!(self, CType::Float | CType::Double | CType::LongDouble)
    }

    /// Pointer type an operand decays to in arithmetic, if any
    pub fn decayed_pointer(&self) -> Option<CType> {
        match self {
            CType::Pointer(_) => Some(self.clone()),
            CType::Array { element, .. } => Some(CType::Pointer(element.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CType::Void => write!(f, "void"),
            CType::Bool => write!(f, "_Bool"),
            CType::Char { unsigned: false } => write!(f, "char"),
            CType::Char { unsigned: true } => write!(f, "unsigned char"),
            CType::Int { kind, unsigned } => {
                if *unsigned {
                    write!(f, "unsigned ")?;
                }
                match kind {
                    IntKind::Short => write!(f, "short"),
                    IntKind::Int => write!(f, "int"),
                    IntKind::Long => write!(f, "long"),
                    IntKind::LongLong => write!(f, "long long"),
                }
            }
            CType::Float => write!(f, "float"),
            CType::Double => write!(f, "double"),
            CType::LongDouble => write!(f, "long double"),
            CType::Pointer(inner) => write!(f, "{}*", inner),
            CType::Array {
                element,
                length: Some(n),
            } => write!(f, "{}[{}]", element, n),
            CType::Array {
                element,
                length: None,
            } => write!(f, "{}[]", element),
            CType::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Types ACSL adds on top of C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicType {
    /// `boolean`
    Boolean,
    /// `integer`
    Integer,
    /// `real`
    Real,
    /// Placeholder element type of the empty set
    Any,
}

/// Type of an ACSL term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A lifted host type
    C(CType),
    /// A builtin logic type
    Logic(LogicType),
    /// Set of elements: `set<T>`
    Set(Box<Type>),
    /// Logic function type
    Function {
        /// Parameter types
        params: Vec<Type>,
        /// Result type
        result: Box<Type>,
    },
    /// Predicate type (a function into truth values)
    Predicate {
        /// Parameter types
        params: Vec<Type>,
    },
}

impl Type {
    /// `boolean`
    pub fn boolean() -> Self {
        Type::Logic(LogicType::Boolean)
    }

    /// `integer`
    pub fn integer() -> Self {
        Type::Logic(LogicType::Integer)
    }

    /// `real`
    pub fn real() -> Self {
        Type::Logic(LogicType::Real)
    }

    fn is_numeric_real(&self) -> bool {
        match self {
            Type::Logic(LogicType::Real) => true,
            Type::C(c) => c.is_floating(),
            _ => false,
        }
    }

    fn is_numeric_integral(&self) -> bool {
        match self {
            Type::Logic(LogicType::Integer) => true,
            Type::C(c) => c.is_integral(),
            _ => false,
        }
    }

    fn is_boolean(&self) -> bool {
        matches!(self, Type::Logic(LogicType::Boolean))
    }

    fn is_typedef(&self) -> bool {
        matches!(self, Type::C(CType::Named(_)))
    }

    fn is_scalar(&self) -> bool {
        self.is_numeric_real() || self.is_numeric_integral() || self.is_boolean() || self.is_typedef()
    }

    fn decayed_pointer(&self) -> Option<CType> {
        match self {
            Type::C(c) => c.decayed_pointer(),
            _ => None,
        }
    }

    /// Type of `left op right` for an arithmetic or bitwise operator
    ///
    /// Pointer operands follow C pointer arithmetic; everything else takes
    /// the [most general](Type::most_general) type of the operands.
    pub fn of_arithmetic(op: BinaryOperator, left: &Type, right: &Type) -> Result<Type> {
        let integral = |ty: &Type| ty.is_numeric_integral() || ty.is_typedef();
        match (op, left.decayed_pointer(), right.decayed_pointer()) {
            (BinaryOperator::Minus, Some(_), Some(_)) => Ok(Type::integer()),
            (BinaryOperator::Plus | BinaryOperator::Minus, Some(pointer), None)
                if integral(right) =>
            {
                Ok(Type::C(pointer))
            }
            (BinaryOperator::Plus, None, Some(pointer)) if integral(left) => Ok(Type::C(pointer)),
            _ => Type::most_general(left, right),
        }
    }

    /// The most general type both `left` and `right` convert to
    pub fn most_general(left: &Type, right: &Type) -> Result<Type> {
        if left == right {
            return Ok(left.clone());
        }
        match (left, right) {
            (Type::Logic(LogicType::Any), other) | (other, Type::Logic(LogicType::Any)) => {
                Ok(other.clone())
            }
            (Type::Set(l), Type::Set(r)) => Ok(Type::Set(Box::new(Type::most_general(l, r)?))),
            (l, r) if l.is_scalar() && r.is_scalar() => {
                if l.is_numeric_real() || r.is_numeric_real() {
                    Ok(Type::real())
                } else if l.is_numeric_integral()
                    || r.is_numeric_integral()
                    || l.is_typedef()
                    || r.is_typedef()
                {
                    Ok(Type::integer())
                } else {
                    Ok(Type::boolean())
                }
            }
            _ => Err(Error::IncompatibleTypes {
                left: left.to_string(),
                right: right.to_string(),
            }),
        }
    }

    /// Closest host type for materializing a value of this type in C
    pub fn to_c_type(&self) -> Option<CType> {
        match self {
            Type::C(c) => Some(c.clone()),
            Type::Logic(LogicType::Boolean) => Some(CType::int()),
            Type::Logic(LogicType::Integer) => Some(CType::Int {
                kind: IntKind::LongLong,
                unsigned: false,
            }),
            Type::Logic(LogicType::Real) => Some(CType::LongDouble),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::C(c) => write!(f, "{}", c),
            Type::Logic(LogicType::Boolean) => write!(f, "boolean"),
            Type::Logic(LogicType::Integer) => write!(f, "integer"),
            Type::Logic(LogicType::Real) => write!(f, "real"),
            Type::Logic(LogicType::Any) => write!(f, "any"),
            Type::Set(elem) => write!(f, "set<{}>", elem),
            Type::Function { params, result } => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "({}) -> {}", params.join(", "), result)
            }
            Type::Predicate { params } => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "predicate({})", params.join(", "))
            }
        }
    }
}

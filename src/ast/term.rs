use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{BinaryOperator, Builtin, ClauseKind, Label, Quantifier, UnaryOperator};
use crate::error::{Error, Result};
use crate::types::{CType, Type};

/// A logic expression that produces a value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Term {
    /// Integer literal
    IntegerLiteral(i128),
    /// Real literal, kept as written
    RealLiteral(String),
    /// Character literal
    CharLiteral(char),
    /// String literal
    StringLiteral(String),
    /// `\true` / `\false` used as a term
    BooleanLiteral(bool),
    /// Free identifier
    Identifier(Identifier),
    /// Identifier captured by a quantifier
    BoundIdentifier(BoundIdentifier),
    /// `\result`
    Result {
        /// Return type of the enclosing function
        ty: Type,
    },
    /// Array access: a\[i\]
    ArrayAccess {
        /// Array being indexed
        array: Arc<Term>,
        /// Index term
        index: Arc<Term>,
    },
    /// Arithmetic, bitwise or comparison term
    Binary(BinaryTerm),
    /// Unary term
    Unary {
        /// Operator
        op: UnaryOperator,
        /// Operand
        operand: Arc<Term>,
    },
    /// Cast: (T) t
    Cast {
        /// Target type
        ty: Type,
        /// Term being cast
        term: Arc<Term>,
    },
    /// `\at(t, L)`; `\old(t)` is `\at(t, Old)`
    At {
        /// Term evaluated at the label
        inner: Arc<Term>,
        /// Program point
        label: Label,
    },
    /// Call of a C or logic function
    FunctionCall {
        /// Function name
        name: String,
        /// Arguments
        args: Vec<Arc<Term>>,
        /// Result type
        ty: Type,
    },
}

/// Free identifier as produced by the annotation converter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    /// Variable name
    pub name: String,
    /// Function the annotation belongs to, None at global scope
    pub function_name: Option<String>,
    /// Declared type
    pub ty: Type,
}

/// Identifier captured by a `\forall` or `\exists` binder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BoundIdentifier {
    /// Variable name
    pub name: String,
    /// Function the annotation belongs to, None at global scope
    pub function_name: Option<String>,
    /// Type declared by the binder
    pub ty: Type,
    /// Quantifier that binds the variable
    pub quantifier: Quantifier,
}

/// Binary term over a primitive arithmetic, bitwise or comparison operator
///
/// Fields are private: every instance has passed operator validation, and
/// derived operators never survive construction.
#[derive(Debug, Clone, Serialize)]
pub struct BinaryTerm {
    left: Arc<Term>,
    right: Arc<Term>,
    op: BinaryOperator,
    ty: Type,
}

impl BinaryTerm {
    fn new(left: Arc<Term>, right: Arc<Term>, op: BinaryOperator) -> Result<Self> {
        if !(op.is_arithmetic() || op.is_bitwise() || op.is_comparison())
            || matches!(op, BinaryOperator::BImp | BinaryOperator::BEqv)
        {
            return Err(Error::invalid_operator(op, "binary term"));
        }
        let ty = if op.is_comparison() {
            Type::boolean()
        } else {
            Type::of_arithmetic(op, &left.expression_type(), &right.expression_type())?
        };
        Ok(BinaryTerm {
            left,
            right,
            op,
            ty,
        })
    }

    /// Left operand
    pub fn left(&self) -> &Arc<Term> {
        &self.left
    }

    /// Right operand
    pub fn right(&self) -> &Arc<Term> {
        &self.right
    }

    /// Operator
    pub fn operator(&self) -> BinaryOperator {
        self.op
    }

    /// Type of the whole term
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Same operands, negated comparison
    pub fn flip_operator(&self) -> Result<BinaryTerm> {
        Ok(BinaryTerm {
            left: Arc::clone(&self.left),
            right: Arc::clone(&self.right),
            op: self.op.flip()?,
            ty: self.ty.clone(),
        })
    }

    /// Rebuild with new operands, keeping the operator
    pub fn with_operands(&self, left: Arc<Term>, right: Arc<Term>) -> Result<BinaryTerm> {
        BinaryTerm::new(left, right, self.op)
    }
}

impl PartialEq for BinaryTerm {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op
            && ((self.left == other.left && self.right == other.right)
                || (self.op.is_commutative()
                    && self.left == other.right
                    && self.right == other.left))
    }
}

impl Eq for BinaryTerm {}

impl Hash for BinaryTerm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.op.hash(state);
        hash_operands(self.op, &*self.left, &*self.right, state);
    }
}

/// Feed two operands into `state`, order-independently for commutative operators
pub(crate) fn hash_operands<T: Hash, H: Hasher>(op: BinaryOperator, left: &T, right: &T, state: &mut H) {
    if op.is_commutative() {
        let l = single_hash(left);
        let r = single_hash(right);
        l.min(r).hash(state);
        l.max(r).hash(state);
    } else {
        left.hash(state);
        right.hash(state);
    }
}

fn single_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl Term {
    /// Integer literal term
    pub fn int(value: i128) -> Arc<Term> {
        Arc::new(Term::IntegerLiteral(value))
    }

    /// Free identifier term
    pub fn identifier(name: &str, function_name: Option<&str>, ty: Type) -> Arc<Term> {
        Arc::new(Term::Identifier(Identifier {
            name: name.to_string(),
            function_name: function_name.map(str::to_string),
            ty,
        }))
    }

    /// `\result` of a function returning `ty`
    pub fn result(ty: Type) -> Arc<Term> {
        Arc::new(Term::Result { ty })
    }

    /// `\old(inner)`
    pub fn old(inner: Arc<Term>) -> Arc<Term> {
        Arc::new(Term::At {
            inner,
            label: Label::Old,
        })
    }

    /// `\at(inner, label)`
    pub fn at(inner: Arc<Term>, label: Label) -> Arc<Term> {
        Arc::new(Term::At { inner, label })
    }

    /// Build a binary term, desugaring `-->` and `<-->`
    ///
    /// `a --> b` becomes `~a | b` and `a <-->` b becomes `~(a ^ b)`.
    /// Logical operators are rejected.
    pub fn binary(left: Arc<Term>, right: Arc<Term>, op: BinaryOperator) -> Result<Arc<Term>> {
        match op {
            BinaryOperator::BImp => {
                let negated = Arc::new(Term::Unary {
                    op: UnaryOperator::BNeg,
                    operand: left,
                });
                Term::binary(negated, right, BinaryOperator::BOr)
            }
            BinaryOperator::BEqv => {
                let xor = Term::binary(left, right, BinaryOperator::BXor)?;
                Ok(Arc::new(Term::Unary {
                    op: UnaryOperator::BNeg,
                    operand: xor,
                }))
            }
            _ => Ok(Arc::new(Term::Binary(BinaryTerm::new(left, right, op)?))),
        }
    }

    /// Returns the binary term if this is a comparison
    pub fn as_comparison(&self) -> Option<&BinaryTerm> {
        match self {
            Term::Binary(binary) if binary.op.is_comparison() => Some(binary),
            _ => None,
        }
    }

    /// Type of the value this term denotes
    pub fn expression_type(&self) -> Type {
        match self {
            Term::IntegerLiteral(_) => Type::integer(),
            Term::RealLiteral(_) => Type::real(),
            Term::CharLiteral(_) => Type::C(CType::Char { unsigned: false }),
            Term::StringLiteral(_) => {
                Type::C(CType::Pointer(Box::new(CType::Char { unsigned: false })))
            }
            Term::BooleanLiteral(_) => Type::boolean(),
            Term::Identifier(id) => id.ty.clone(),
            Term::BoundIdentifier(id) => id.ty.clone(),
            Term::Result { ty } => ty.clone(),
            Term::ArrayAccess { array, .. } => match array.expression_type() {
                Type::C(CType::Array { element, .. }) | Type::C(CType::Pointer(element)) => {
                    Type::C(*element)
                }
                other => other,
            },
            Term::Binary(binary) => binary.ty.clone(),
            Term::Unary { op, operand } => match op {
                UnaryOperator::Address => match operand.expression_type() {
                    Type::C(c) => Type::C(CType::Pointer(Box::new(c))),
                    other => other,
                },
                UnaryOperator::Pointer => match operand.expression_type() {
                    Type::C(CType::Pointer(inner)) => Type::C(*inner),
                    other => other,
                },
                UnaryOperator::Sizeof => Type::integer(),
                _ => operand.expression_type(),
            },
            Term::Cast { ty, .. } => ty.clone(),
            Term::At { inner, .. } => inner.expression_type(),
            Term::FunctionCall { ty, .. } => ty.clone(),
        }
    }

    /// Direct children, left to right
    pub fn children(&self) -> Vec<&Arc<Term>> {
        match self {
            Term::IntegerLiteral(_)
            | Term::RealLiteral(_)
            | Term::CharLiteral(_)
            | Term::StringLiteral(_)
            | Term::BooleanLiteral(_)
            | Term::Identifier(_)
            | Term::BoundIdentifier(_)
            | Term::Result { .. } => Vec::new(),
            Term::ArrayAccess { array, index } => vec![array, index],
            Term::Binary(binary) => vec![&binary.left, &binary.right],
            Term::Unary { operand, .. } => vec![operand],
            Term::Cast { term, .. } => vec![term],
            Term::At { inner, .. } => vec![inner],
            Term::FunctionCall { args, .. } => args.iter().collect(),
        }
    }

    /// Builtin marker carried by this node itself, if any
    pub fn builtin(&self) -> Option<Builtin> {
        match self {
            Term::Result { .. } => Some(Builtin::Result),
            Term::At {
                label: Label::Old, ..
            } => Some(Builtin::Old),
            Term::At { label, .. } => Some(Builtin::At(label.clone())),
            _ => None,
        }
    }

    /// A term is allowed in a clause iff its own builtin and all children are
    pub fn is_allowed_in(&self, clause: ClauseKind) -> bool {
        if let Some(builtin) = self.builtin() {
            if !builtin.is_allowed_in(clause) {
                return false;
            }
        }
        self.children()
            .into_iter()
            .all(|child| child.is_allowed_in(clause))
    }

    /// Dispatch to a term visitor
    pub fn accept<'a, V: TermVisitor<'a>>(&'a self, visitor: &mut V) -> Result<V::Output> {
        visitor.visit_term(self)
    }
}

/// Visitor over terms
///
/// Visitors receive borrowed nodes so that they can key caches by node
/// identity for as long as the tree is borrowed.
pub trait TermVisitor<'a> {
    /// Value produced per visited term
    type Output;

    /// Visit one term
    fn visit_term(&mut self, term: &'a Term) -> Result<Self::Output>;
}

/// Binary operand, parenthesized when it is itself a binary term or a cast
struct Operand<'t>(&'t Term);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Term::Binary(_) | Term::Cast { .. } => write!(f, "({})", self.0),
            term => write!(f, "{}", term),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::IntegerLiteral(n) => write!(f, "{}", n),
            Term::RealLiteral(text) => write!(f, "{}", text),
            Term::CharLiteral(c) => write!(f, "'{}'", c.escape_default()),
            Term::StringLiteral(s) => write!(f, "\"{}\"", s.escape_default()),
            Term::BooleanLiteral(true) => write!(f, "\\true"),
            Term::BooleanLiteral(false) => write!(f, "\\false"),
            Term::Identifier(id) => write!(f, "{}", id.name),
            Term::BoundIdentifier(id) => write!(f, "{}", id.name),
            Term::Result { .. } => write!(f, "\\result"),
            Term::ArrayAccess { array, index } => write!(f, "{}[{}]", array, index),
            Term::Binary(binary) => {
                write!(f, "{} {} {}", Operand(&binary.left), binary.op, Operand(&binary.right))
            }
            Term::Unary {
                op: UnaryOperator::Sizeof,
                operand,
            } => write!(f, "sizeof({})", operand),
            Term::Unary { op, operand } => write!(f, "{}({})", op, operand),
            Term::Cast { ty, term } => write!(f, "({}) {}", ty, Operand(term)),
            Term::At {
                inner,
                label: Label::Old,
            } => write!(f, "\\old({})", inner),
            Term::At { inner, label } => write!(f, "\\at({}, {})", inner, label),
            Term::FunctionCall { name, args, .. } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", name, args.join(", "))
            }
        }
    }
}

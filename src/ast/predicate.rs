use lazy_static::lazy_static;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::term::hash_operands;
use super::{BinaryOperator, Binder, Builtin, ClauseKind, Label, Quantifier, Term};
use crate::error::{Error, Result};

lazy_static! {
    static ref TRUE: Arc<Predicate> = Arc::new(Predicate::True);
    static ref FALSE: Arc<Predicate> = Arc::new(Predicate::False);
}

/// A logic expression with boolean meaning
///
/// Negation is a polarity flag on each node rather than a wrapper node.
/// `True` and `False` carry no flag; negating one yields the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Predicate {
    /// `\true`
    True,
    /// `\false`
    False,
    /// A single comparison
    Simple(SimplePredicate),
    /// Conjunction or disjunction
    Logical(LogicalPredicate),
    /// `c ? t : e` over predicates
    Ternary {
        /// Condition
        condition: Arc<Predicate>,
        /// Branch taken when the condition holds
        then: Arc<Predicate>,
        /// Branch taken otherwise
        otherwise: Arc<Predicate>,
        /// Polarity flag
        negated: bool,
    },
    /// `\forall` / `\exists`
    Quantified {
        /// Quantifier kind
        quantifier: Quantifier,
        /// Declared variables
        binders: Vec<Binder>,
        /// Quantified body
        body: Arc<Predicate>,
        /// Polarity flag
        negated: bool,
    },
    /// `\at(p, L)`
    At {
        /// Predicate evaluated at the label
        inner: Arc<Predicate>,
        /// Program point
        label: Label,
        /// Polarity flag
        negated: bool,
    },
}

/// Predicate wrapping exactly one comparison term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SimplePredicate {
    term: Arc<Term>,
    negated: bool,
}

impl SimplePredicate {
    /// The comparison term
    pub fn term(&self) -> &Arc<Term> {
        &self.term
    }

    /// Polarity flag
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Equivalent unflagged predicate, negating the comparison operator itself
    pub fn without_negation(&self) -> Result<Arc<Predicate>> {
        if !self.negated {
            return Ok(Arc::new(Predicate::Simple(self.clone())));
        }
        let comparison = self.term.as_comparison().ok_or_else(|| Error::NotAComparison {
            term: self.term.to_string(),
        })?;
        Ok(Arc::new(Predicate::Simple(SimplePredicate {
            term: Arc::new(Term::Binary(comparison.flip_operator()?)),
            negated: false,
        })))
    }
}

/// Connectives a logical predicate can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogicalOperator {
    /// `&&`
    And,
    /// `||`
    Or,
}

impl LogicalOperator {
    /// `&&` <-> `||`
    pub fn dual(self) -> Self {
        match self {
            LogicalOperator::And => LogicalOperator::Or,
            LogicalOperator::Or => LogicalOperator::And,
        }
    }

    fn as_binary(self) -> BinaryOperator {
        match self {
            LogicalOperator::And => BinaryOperator::And,
            LogicalOperator::Or => BinaryOperator::Or,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_binary())
    }
}

/// Conjunction or disjunction of two predicates
#[derive(Debug, Clone, Serialize)]
pub struct LogicalPredicate {
    /// Left operand
    pub left: Arc<Predicate>,
    /// Right operand
    pub right: Arc<Predicate>,
    /// Connective
    pub op: LogicalOperator,
    /// Polarity flag
    pub negated: bool,
}

impl PartialEq for LogicalPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op
            && self.negated == other.negated
            && ((self.left == other.left && self.right == other.right)
                || (self.left == other.right && self.right == other.left))
    }
}

impl Eq for LogicalPredicate {}

impl Hash for LogicalPredicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.op.hash(state);
        self.negated.hash(state);
        hash_operands(self.op.as_binary(), &*self.left, &*self.right, state);
    }
}

impl Predicate {
    /// The shared `\true` constant
    pub fn truth() -> Arc<Predicate> {
        Arc::clone(&TRUE)
    }

    /// The shared `\false` constant
    pub fn falsehood() -> Arc<Predicate> {
        Arc::clone(&FALSE)
    }

    /// Shared constant for a boolean value
    pub fn constant(value: bool) -> Arc<Predicate> {
        if value {
            Predicate::truth()
        } else {
            Predicate::falsehood()
        }
    }

    /// Predicate over a comparison term
    pub fn simple(term: Arc<Term>) -> Result<Arc<Predicate>> {
        if term.as_comparison().is_none() {
            return Err(Error::NotAComparison {
                term: term.to_string(),
            });
        }
        Ok(Arc::new(Predicate::Simple(SimplePredicate {
            term,
            negated: false,
        })))
    }

    /// `left && right`
    pub fn and(left: Arc<Predicate>, right: Arc<Predicate>) -> Arc<Predicate> {
        Predicate::connect(left, right, LogicalOperator::And, false)
    }

    /// `left || right`
    pub fn or(left: Arc<Predicate>, right: Arc<Predicate>) -> Arc<Predicate> {
        Predicate::connect(left, right, LogicalOperator::Or, false)
    }

    /// Logical predicate with an explicit polarity
    pub fn connect(
        left: Arc<Predicate>,
        right: Arc<Predicate>,
        op: LogicalOperator,
        negated: bool,
    ) -> Arc<Predicate> {
        Arc::new(Predicate::Logical(LogicalPredicate {
            left,
            right,
            op,
            negated,
        }))
    }

    /// Build from a logical operator token, desugaring `==>`, `<==>` and `^^`
    pub fn logical(
        left: Arc<Predicate>,
        right: Arc<Predicate>,
        op: BinaryOperator,
    ) -> Result<Arc<Predicate>> {
        match op {
            BinaryOperator::And => Ok(Predicate::and(left, right)),
            BinaryOperator::Or => Ok(Predicate::or(left, right)),
            BinaryOperator::Imp => Ok(Predicate::or(left.negated(), right)),
            BinaryOperator::Eqv => Ok(Predicate::and(
                Predicate::or(left.negated(), Arc::clone(&right)),
                Predicate::or(left, right.negated()),
            )),
            BinaryOperator::Xor => {
                Ok(Predicate::logical(left, right, BinaryOperator::Eqv)?.negated())
            }
            other => Err(Error::invalid_operator(other, "logical predicate")),
        }
    }

    /// `condition ? then : otherwise`
    pub fn ternary(
        condition: Arc<Predicate>,
        then: Arc<Predicate>,
        otherwise: Arc<Predicate>,
    ) -> Arc<Predicate> {
        Arc::new(Predicate::Ternary {
            condition,
            then,
            otherwise,
            negated: false,
        })
    }

    /// `\at(inner, label)`
    pub fn at(inner: Arc<Predicate>, label: Label) -> Arc<Predicate> {
        Arc::new(Predicate::At {
            inner,
            label,
            negated: false,
        })
    }

    /// `\old(inner)`
    pub fn old(inner: Arc<Predicate>) -> Arc<Predicate> {
        Predicate::at(inner, Label::Old)
    }

    /// Quantified predicate over an already bound body
    pub fn quantified_unchecked(
        quantifier: Quantifier,
        binders: Vec<Binder>,
        body: Arc<Predicate>,
    ) -> Arc<Predicate> {
        Arc::new(Predicate::Quantified {
            quantifier,
            binders,
            body,
            negated: false,
        })
    }

    /// Polarity flag; always false for `True` and `False`
    pub fn is_negated(&self) -> bool {
        match self {
            Predicate::True | Predicate::False => false,
            Predicate::Simple(simple) => simple.negated,
            Predicate::Logical(logical) => logical.negated,
            Predicate::Ternary { negated, .. }
            | Predicate::Quantified { negated, .. }
            | Predicate::At { negated, .. } => *negated,
        }
    }

    /// Same predicate with the polarity flag toggled
    ///
    /// Children are shared with `self`. `True` and `False` swap.
    pub fn negated(&self) -> Arc<Predicate> {
        match self {
            Predicate::True => Predicate::falsehood(),
            Predicate::False => Predicate::truth(),
            Predicate::Simple(simple) => Arc::new(Predicate::Simple(SimplePredicate {
                term: Arc::clone(&simple.term),
                negated: !simple.negated,
            })),
            Predicate::Logical(logical) => Predicate::connect(
                Arc::clone(&logical.left),
                Arc::clone(&logical.right),
                logical.op,
                !logical.negated,
            ),
            Predicate::Ternary {
                condition,
                then,
                otherwise,
                negated,
            } => Arc::new(Predicate::Ternary {
                condition: Arc::clone(condition),
                then: Arc::clone(then),
                otherwise: Arc::clone(otherwise),
                negated: !negated,
            }),
            Predicate::Quantified {
                quantifier,
                binders,
                body,
                negated,
            } => Arc::new(Predicate::Quantified {
                quantifier: *quantifier,
                binders: binders.clone(),
                body: Arc::clone(body),
                negated: !negated,
            }),
            Predicate::At {
                inner,
                label,
                negated,
            } => Arc::new(Predicate::At {
                inner: Arc::clone(inner),
                label: label.clone(),
                negated: !negated,
            }),
        }
    }

    /// Returns true for the `\true` constant
    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    /// Returns true for the `\false` constant
    pub fn is_false(&self) -> bool {
        matches!(self, Predicate::False)
    }

    /// Builtin marker carried by this node itself, if any
    pub fn builtin(&self) -> Option<Builtin> {
        match self {
            Predicate::At {
                label: Label::Old, ..
            } => Some(Builtin::Old),
            Predicate::At { label, .. } => Some(Builtin::At(label.clone())),
            _ => None,
        }
    }

    /// A predicate is allowed in a clause iff its own builtin and all children are
    pub fn is_allowed_in(&self, clause: ClauseKind) -> bool {
        if let Some(builtin) = self.builtin() {
            if !builtin.is_allowed_in(clause) {
                return false;
            }
        }
        match self {
            Predicate::True | Predicate::False => true,
            Predicate::Simple(simple) => simple.term.is_allowed_in(clause),
            Predicate::Logical(logical) => {
                logical.left.is_allowed_in(clause) && logical.right.is_allowed_in(clause)
            }
            Predicate::Ternary {
                condition,
                then,
                otherwise,
                ..
            } => {
                condition.is_allowed_in(clause)
                    && then.is_allowed_in(clause)
                    && otherwise.is_allowed_in(clause)
            }
            Predicate::Quantified { body, .. } => body.is_allowed_in(clause),
            Predicate::At { inner, .. } => inner.is_allowed_in(clause),
        }
    }

    /// Dispatch to a predicate visitor
    pub fn accept<'a, V: PredicateVisitor<'a>>(&'a self, visitor: &mut V) -> Result<V::Output> {
        visitor.visit_predicate(self)
    }
}

/// Visitor over predicates
pub trait PredicateVisitor<'a> {
    /// Value produced per visited predicate
    type Output;

    /// Visit one predicate
    fn visit_predicate(&mut self, predicate: &'a Predicate) -> Result<Self::Output>;
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated() {
            write!(f, "!")?;
        }
        match self {
            Predicate::True => write!(f, "\\true"),
            Predicate::False => write!(f, "\\false"),
            Predicate::Simple(simple) if simple.negated => write!(f, "({})", simple.term),
            Predicate::Simple(simple) => write!(f, "{}", simple.term),
            Predicate::Logical(logical) => {
                write!(f, "({} {} {})", logical.left, logical.op, logical.right)
            }
            Predicate::Ternary {
                condition,
                then,
                otherwise,
                ..
            } => write!(f, "({} ? {} : {})", condition, then, otherwise),
            Predicate::Quantified {
                quantifier,
                binders,
                body,
                ..
            } => {
                let binders: Vec<String> = binders.iter().map(|b| b.to_string()).collect();
                write!(f, "({} {}; {})", quantifier, binders.join(", "), body)
            }
            Predicate::At {
                inner,
                label: Label::Old,
                ..
            } => write!(f, "\\old({})", inner),
            Predicate::At { inner, label, .. } => write!(f, "\\at({}, {})", inner, label),
        }
    }
}

//! Boolean simplification of predicates.
//!
//! Keeps predicates in a lazily negated normal form:
//!
//! - Constants absorb (`p && \false`) or vanish (`p && \true`)
//! - Equal or complementary operands collapse
//! - Negated conjunctions and disjunctions are pushed inward (De Morgan)
//! - Negated comparisons flip their operator (`!(x == 1)` -> `x != 1`)
//! - Negated ternaries and quantifiers are rewritten algebraically
//!
//! Children are simplified before their parent, unchanged subtrees are
//! shared with the input, and `simplify` is idempotent.

use std::sync::Arc;

use crate::ast::{LogicalOperator, LogicalPredicate, Predicate};

/// Toggle the polarity of a predicate without simplifying it
pub fn negate(predicate: &Arc<Predicate>) -> Arc<Predicate> {
    predicate.negated()
}

/// Simplify a predicate into lazily negated normal form.
///
/// The result is semantically equivalent to the input. Its only negated
/// nodes are `\at` predicates, which cannot be simplified across their label.
pub fn simplify(predicate: &Arc<Predicate>) -> Arc<Predicate> {
    match predicate.as_ref() {
        // === Leaves ===
        Predicate::True | Predicate::False => Arc::clone(predicate),

        // \at cannot be simplified across an unresolved label; only constants
        // are independent of the program point
        Predicate::At { inner, negated, .. } => match inner.as_ref() {
            Predicate::True | Predicate::False => apply_polarity(Arc::clone(inner), *negated),
            _ => Arc::clone(predicate),
        },

        Predicate::Simple(simple) => {
            if !simple.is_negated() {
                return Arc::clone(predicate);
            }
            match simple.without_negation() {
                Ok(flipped) => flipped,
                Err(err) => {
                    // Keeping the flag is still sound
                    tracing::warn!("cannot flip comparison {}: {}", simple.term(), err);
                    Arc::clone(predicate)
                }
            }
        }

        // === Connectives ===
        Predicate::Logical(logical) => simplify_logical(predicate, logical),

        Predicate::Ternary {
            condition,
            then,
            otherwise,
            negated,
        } => {
            let c = simplify(condition);
            let t = simplify(then);
            let e = simplify(otherwise);
            let with_polarity = |p: Arc<Predicate>| apply_polarity(p, *negated);

            if c.is_true() {
                return with_polarity(t);
            }
            if c.is_false() {
                return with_polarity(e);
            }
            if t == e {
                return with_polarity(t);
            }
            if *negated {
                return negated_ternary(c, &t, &e);
            }
            if Arc::ptr_eq(&c, condition) && Arc::ptr_eq(&t, then) && Arc::ptr_eq(&e, otherwise) {
                return Arc::clone(predicate);
            }
            Predicate::ternary(c, t, e)
        }

        Predicate::Quantified {
            quantifier,
            binders,
            body,
            negated,
        } => {
            let simplified = simplify(body);
            let (quantifier, simplified) = if *negated {
                // !\forall x; p == \exists x; !p
                (quantifier.dual(), negate_simplified(&simplified))
            } else {
                (*quantifier, simplified)
            };

            if simplified.is_true() || simplified.is_false() {
                return simplified;
            }
            if !*negated && Arc::ptr_eq(&simplified, body) {
                return Arc::clone(predicate);
            }
            Predicate::quantified_unchecked(quantifier, binders.clone(), simplified)
        }
    }
}

fn simplify_logical(original: &Arc<Predicate>, logical: &LogicalPredicate) -> Arc<Predicate> {
    let left = simplify(&logical.left);
    let right = simplify(&logical.right);

    if let Some(folded) = fold_connective(&left, &right, logical.op) {
        return apply_polarity(folded, logical.negated);
    }
    if logical.negated {
        // !(a && b) == !a || !b
        return connect_simplified(
            negate_simplified(&left),
            negate_simplified(&right),
            logical.op.dual(),
        );
    }
    if Arc::ptr_eq(&left, &logical.left) && Arc::ptr_eq(&right, &logical.right) {
        return Arc::clone(original);
    }
    Predicate::connect(left, right, logical.op, false)
}

/// Collapse `left op right` when a constant, a repeated operand or a
/// complementary pair decides it. Both operands are already simplified.
fn fold_connective(
    left: &Arc<Predicate>,
    right: &Arc<Predicate>,
    op: LogicalOperator,
) -> Option<Arc<Predicate>> {
    // (absorbing, identity) element of the connective
    let (absorbing, identity) = match op {
        LogicalOperator::And => (false, true),
        LogicalOperator::Or => (true, false),
    };

    if is_constant(left, absorbing) || is_constant(right, absorbing) || are_complementary(left, right)
    {
        return Some(Predicate::constant(absorbing));
    }
    if left == right || is_constant(right, identity) {
        return Some(Arc::clone(left));
    }
    if is_constant(left, identity) {
        return Some(Arc::clone(right));
    }
    None
}

fn connect_simplified(
    left: Arc<Predicate>,
    right: Arc<Predicate>,
    op: LogicalOperator,
) -> Arc<Predicate> {
    match fold_connective(&left, &right, op) {
        Some(folded) => folded,
        None => Predicate::connect(left, right, op, false),
    }
}

/// `!(c ? t : e) == (!c || !t) && (c || !e)` over simplified operands
fn negated_ternary(
    condition: Arc<Predicate>,
    then: &Arc<Predicate>,
    otherwise: &Arc<Predicate>,
) -> Arc<Predicate> {
    let not_then = connect_simplified(
        negate_simplified(&condition),
        negate_simplified(then),
        LogicalOperator::Or,
    );
    let not_else = connect_simplified(condition, negate_simplified(otherwise), LogicalOperator::Or);
    connect_simplified(not_then, not_else, LogicalOperator::And)
}

/// `simplify(!p)` for an already simplified `p`
///
/// Walks the normal form once instead of simplifying the negation from
/// scratch: comparisons flip, connectives and quantifiers dualize.
fn negate_simplified(predicate: &Arc<Predicate>) -> Arc<Predicate> {
    match predicate.as_ref() {
        Predicate::True | Predicate::False | Predicate::Simple(_) | Predicate::At { .. } => {
            simplify(&predicate.negated())
        }
        Predicate::Logical(logical) => {
            if let Some(folded) = fold_connective(&logical.left, &logical.right, logical.op) {
                return apply_polarity(folded, true);
            }
            connect_simplified(
                negate_simplified(&logical.left),
                negate_simplified(&logical.right),
                logical.op.dual(),
            )
        }
        Predicate::Ternary {
            condition,
            then,
            otherwise,
            ..
        } => {
            if condition.is_true() || then == otherwise {
                return negate_simplified(then);
            }
            if condition.is_false() {
                return negate_simplified(otherwise);
            }
            negated_ternary(Arc::clone(condition), then, otherwise)
        }
        Predicate::Quantified {
            quantifier,
            binders,
            body,
            ..
        } => {
            let body = negate_simplified(body);
            if body.is_true() || body.is_false() {
                return body;
            }
            Predicate::quantified_unchecked(quantifier.dual(), binders.clone(), body)
        }
    }
}

fn is_constant(predicate: &Predicate, value: bool) -> bool {
    if value {
        predicate.is_true()
    } else {
        predicate.is_false()
    }
}

/// Both operands are already simplified
fn are_complementary(left: &Arc<Predicate>, right: &Arc<Predicate>) -> bool {
    *left == negate_simplified(right)
}

/// `predicate` is already simplified
fn apply_polarity(predicate: Arc<Predicate>, negated: bool) -> Arc<Predicate> {
    if negated {
        negate_simplified(&predicate)
    } else {
        predicate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, Binder, Label, Quantifier, Term};
    use crate::types::{CType, Type};

    fn var(name: &str) -> Arc<Term> {
        Term::identifier(name, Some("f"), Type::C(CType::int()))
    }

    fn cmp(name: &str, op: BinaryOperator, value: i128) -> Arc<Predicate> {
        Predicate::simple(Term::binary(var(name), Term::int(value), op).unwrap()).unwrap()
    }

    #[test]
    fn test_negated_comparison_flips_operator() {
        let p = cmp("x", BinaryOperator::Eq, 10);
        let simplified = simplify(&negate(&p));
        assert_eq!(simplified, cmp("x", BinaryOperator::Neq, 10));
        assert!(!simplified.is_negated());
        assert_eq!(simplified.to_string(), "x != 10");
    }

    #[test]
    fn test_identity_and_absorbing_elements() {
        let p = cmp("x", BinaryOperator::Gt, 0);
        assert_eq!(simplify(&Predicate::and(p.clone(), Predicate::truth())), p);
        assert_eq!(simplify(&Predicate::or(Predicate::falsehood(), p.clone())), p);
        assert!(simplify(&Predicate::and(p.clone(), Predicate::falsehood())).is_false());
        assert!(simplify(&Predicate::or(p, Predicate::truth())).is_true());
    }

    #[test]
    fn test_negated_absorbing_element_flips_result() {
        let p = cmp("x", BinaryOperator::Gt, 0);
        let and_false = Predicate::and(p, Predicate::falsehood());
        assert!(simplify(&negate(&and_false)).is_true());
    }

    #[test]
    fn test_complementary_operands() {
        let p = cmp("x", BinaryOperator::Gt, 0);
        assert!(simplify(&Predicate::and(p.clone(), negate(&p))).is_false());
        assert!(simplify(&Predicate::or(p.clone(), negate(&p))).is_true());

        // x > 0 && x <= 0 is recognized without an explicit flag
        let q = cmp("x", BinaryOperator::Leq, 0);
        assert!(simplify(&Predicate::and(p, q)).is_false());
    }

    #[test]
    fn test_de_morgan() {
        let a = cmp("x", BinaryOperator::Gt, 0);
        let b = cmp("y", BinaryOperator::Lt, 3);
        let lhs = simplify(&negate(&Predicate::and(a.clone(), b.clone())));
        let rhs = simplify(&Predicate::or(negate(&a), negate(&b)));
        assert_eq!(lhs, rhs);
        assert_eq!(
            lhs,
            Predicate::or(
                cmp("x", BinaryOperator::Leq, 0),
                cmp("y", BinaryOperator::Geq, 3)
            )
        );
    }

    #[test]
    fn test_equal_operands_collapse() {
        let a = cmp("x", BinaryOperator::Gt, 0);
        assert_eq!(simplify(&Predicate::or(a.clone(), a.clone())), a);
        assert_eq!(
            simplify(&negate(&Predicate::and(a.clone(), a))),
            cmp("x", BinaryOperator::Leq, 0)
        );
    }

    #[test]
    fn test_ternary_folding() {
        let a = cmp("x", BinaryOperator::Gt, 0);
        let b = cmp("y", BinaryOperator::Gt, 0);
        assert_eq!(
            simplify(&Predicate::ternary(Predicate::truth(), a.clone(), b.clone())),
            a
        );
        assert_eq!(
            simplify(&Predicate::ternary(b.clone(), a.clone(), a.clone())),
            a
        );

        let c = cmp("z", BinaryOperator::Eq, 0);
        let t = Predicate::ternary(c.clone(), a.clone(), b.clone());
        assert_eq!(simplify(&t), t);
        let expected = Predicate::and(
            Predicate::or(simplify(&negate(&c)), simplify(&negate(&a))),
            Predicate::or(c, simplify(&negate(&b))),
        );
        assert_eq!(simplify(&negate(&t)), expected);
    }

    #[test]
    fn test_negated_quantifier_switches_kind() {
        let body = cmp("i", BinaryOperator::Geq, 0);
        let binders = vec![Binder::new(Type::integer(), ["i"])];
        let forall = Predicate::quantified_unchecked(Quantifier::ForAll, binders.clone(), body);
        let simplified = simplify(&negate(&forall));
        assert_eq!(
            simplified,
            Predicate::quantified_unchecked(
                Quantifier::Exists,
                binders,
                cmp("i", BinaryOperator::Lt, 0)
            )
        );
    }

    #[test]
    fn test_at_is_left_alone() {
        let at = Predicate::at(negate(&cmp("x", BinaryOperator::Eq, 1)), Label::Old);
        assert!(Arc::ptr_eq(&simplify(&at), &at));
    }

    #[test]
    fn test_at_of_constant_folds() {
        let at = Predicate::old(Predicate::truth());
        assert!(simplify(&at).is_true());
        assert!(simplify(&negate(&at)).is_false());
    }

    #[test]
    fn test_unchanged_tree_is_shared() {
        let p = Predicate::and(cmp("x", BinaryOperator::Gt, 0), cmp("y", BinaryOperator::Gt, 0));
        assert!(Arc::ptr_eq(&simplify(&p), &p));
    }

    fn nested_negated_ternaries(depth: usize) -> Arc<Predicate> {
        let mut p = cmp("x", BinaryOperator::Gt, 0);
        for i in 0..depth {
            let then = cmp("y", BinaryOperator::Gt, i as i128);
            let otherwise = cmp("z", BinaryOperator::Gt, i as i128);
            p = negate(&Predicate::ternary(p, then, otherwise));
        }
        p
    }

    #[test]
    fn test_negating_simplified_tree_matches_simplify() {
        let a = cmp("x", BinaryOperator::Gt, 0);
        let b = cmp("y", BinaryOperator::Lt, 3);
        let forall = Predicate::quantified_unchecked(
            Quantifier::ForAll,
            vec![Binder::new(Type::integer(), ["i"])],
            Predicate::or(a.clone(), cmp("i", BinaryOperator::Eq, 0)),
        );
        let samples = [
            Predicate::and(a.clone(), negate(&b)),
            Predicate::ternary(b.clone(), a.clone(), Predicate::old(a.clone())),
            negate(&forall),
            nested_negated_ternaries(3),
        ];
        for p in samples {
            let normal = simplify(&p);
            assert_eq!(negate_simplified(&normal), simplify(&negate(&normal)));
        }
    }

    #[test]
    fn test_deep_negated_ternaries() {
        let p = nested_negated_ternaries(12);
        let once = simplify(&p);
        assert!(!once.is_negated());
        assert_eq!(simplify(&once), once);
    }

    #[test]
    fn test_idempotent() {
        let a = cmp("x", BinaryOperator::Gt, 0);
        let b = cmp("y", BinaryOperator::Lt, 3);
        let c = cmp("z", BinaryOperator::Eq, 1);
        let p = negate(&Predicate::ternary(
            a.clone(),
            negate(&Predicate::or(b.clone(), c.clone())),
            Predicate::and(negate(&a), c),
        ));
        let once = simplify(&p);
        assert_eq!(simplify(&once), once);
    }
}

//! Property-based tests for the boolean simplifier and binder substitution
//!
//! Predicates are generated over a small pool of comparisons so that equal
//! and complementary operands show up often:
//! 1. `simplify` is idempotent and sound on constants, `\at` included
//! 2. De Morgan, absorption and contradiction laws hold after simplification
//! 3. Commutative connectives compare and hash equal in either order
//! 4. Binder substitution never touches identifiers no binder declares

use acsl::ast::{BinaryOperator, Binder, Label, Predicate, Quantifier, Term};
use acsl::bind::bind_predicate;
use acsl::simplify::{negate, simplify};
use acsl::types::{CType, Type};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

fn comparison_operator() -> impl Strategy<Value = BinaryOperator> {
    prop_oneof![
        Just(BinaryOperator::Eq),
        Just(BinaryOperator::Neq),
        Just(BinaryOperator::Lt),
        Just(BinaryOperator::Gt),
        Just(BinaryOperator::Leq),
        Just(BinaryOperator::Geq),
    ]
}

/// `v op n` over two variables and three constants
fn atom() -> impl Strategy<Value = Arc<Predicate>> {
    (prop_oneof![Just("x"), Just("y")], comparison_operator(), 0i128..3).prop_map(
        |(name, op, value)| {
            let var = Term::identifier(name, Some("f"), Type::C(CType::int()));
            Predicate::simple(Term::binary(var, Term::int(value), op).unwrap()).unwrap()
        },
    )
}

fn state_label() -> impl Strategy<Value = Label> {
    prop_oneof![Just(Label::Old), Just(Label::Pre)]
}

/// Constants, comparisons, `&&`, `||`, `\at` and negation
fn connective_predicate() -> impl Strategy<Value = Arc<Predicate>> {
    let leaf = prop_oneof![
        1 => Just(Predicate::truth()),
        1 => Just(Predicate::falsehood()),
        6 => atom(),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Predicate::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Predicate::or(l, r)),
            (inner.clone(), state_label()).prop_map(|(p, label)| Predicate::at(p, label)),
            inner.prop_map(|p| negate(&p)),
        ]
    })
}

/// Connectives plus ternaries and quantifiers
fn any_predicate() -> impl Strategy<Value = Arc<Predicate>> {
    connective_predicate().prop_recursive(2, 48, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| Predicate::ternary(c, t, e)),
            (inner.clone(), any::<bool>()).prop_map(|(body, forall)| {
                let quantifier = if forall {
                    Quantifier::ForAll
                } else {
                    Quantifier::Exists
                };
                Predicate::quantified_unchecked(
                    quantifier,
                    vec![Binder::new(Type::integer(), ["i"])],
                    body,
                )
            }),
            inner.prop_map(|p| negate(&p)),
        ]
    })
}

fn hash_of(p: &Predicate) -> u64 {
    let mut hasher = DefaultHasher::new();
    p.hash(&mut hasher);
    hasher.finish()
}

/// No negated node survives simplification outside `\at`
fn is_normal(p: &Predicate) -> bool {
    match p {
        Predicate::True | Predicate::False => true,
        Predicate::Simple(simple) => !simple.is_negated(),
        Predicate::Logical(logical) => {
            !logical.negated && is_normal(&logical.left) && is_normal(&logical.right)
        }
        Predicate::Ternary {
            condition,
            then,
            otherwise,
            negated,
        } => !negated && is_normal(condition) && is_normal(then) && is_normal(otherwise),
        Predicate::Quantified { body, negated, .. } => !negated && is_normal(body),
        Predicate::At { .. } => true,
    }
}

// =============================================================================
// SIMPLIFIER PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn simplify_is_idempotent(p in any_predicate()) {
        let once = simplify(&p);
        prop_assert_eq!(simplify(&once), once);
    }

    #[test]
    fn simplify_reaches_normal_form(p in any_predicate()) {
        prop_assert!(is_normal(&simplify(&p)));
    }

    #[test]
    fn double_negation_is_identity(p in any_predicate()) {
        prop_assert_eq!(negate(&negate(&p)), p);
    }

    #[test]
    fn de_morgan(a in connective_predicate(), b in connective_predicate()) {
        let lhs = simplify(&negate(&Predicate::and(a.clone(), b.clone())));
        let rhs = simplify(&Predicate::or(negate(&a), negate(&b)));
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn identity_elements_vanish(p in any_predicate()) {
        let expected = simplify(&p);
        prop_assert_eq!(simplify(&Predicate::and(p.clone(), Predicate::truth())), expected.clone());
        prop_assert_eq!(simplify(&Predicate::or(p, Predicate::falsehood())), expected);
    }

    #[test]
    fn absorbing_elements_win(p in any_predicate()) {
        prop_assert!(simplify(&Predicate::and(p.clone(), Predicate::falsehood())).is_false());
        prop_assert!(simplify(&Predicate::or(Predicate::truth(), p)).is_true());
    }

    #[test]
    fn contradiction_and_excluded_middle(p in connective_predicate()) {
        prop_assert!(simplify(&Predicate::and(p.clone(), negate(&p))).is_false());
        prop_assert!(simplify(&Predicate::or(p.clone(), negate(&p))).is_true());
    }

    #[test]
    fn negated_state_predicates_cancel(p in connective_predicate(), label in state_label()) {
        let at = Predicate::at(p, label);
        prop_assert!(simplify(&Predicate::and(at.clone(), negate(&at))).is_false());
        prop_assert_eq!(simplify(&negate(&negate(&at))), simplify(&at));
    }

    #[test]
    fn connectives_commute(a in any_predicate(), b in any_predicate()) {
        let ab = Predicate::and(a.clone(), b.clone());
        let ba = Predicate::and(b.clone(), a.clone());
        prop_assert_eq!(&ab, &ba);
        prop_assert_eq!(hash_of(&ab), hash_of(&ba));

        let ab = Predicate::or(a.clone(), b.clone());
        let ba = Predicate::or(b, a);
        prop_assert_eq!(&ab, &ba);
        prop_assert_eq!(hash_of(&ab), hash_of(&ba));
    }
}

// =============================================================================
// BINDER PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn binding_unused_names_is_identity(p in any_predicate()) {
        let binders = vec![Binder::new(Type::integer(), ["k", "j"])];
        let bound = bind_predicate(&p, &binders, Quantifier::ForAll, Some("f")).unwrap();
        prop_assert_eq!(&bound, &p);
    }

    #[test]
    fn binding_leaves_input_untouched(p in connective_predicate()) {
        let before = (*p).clone();
        let binders = vec![Binder::new(Type::integer(), ["x"])];
        let bound = bind_predicate(&p, &binders, Quantifier::Exists, Some("f")).unwrap();
        prop_assert_eq!(&*p, &before);
        prop_assert_eq!(bound.to_string(), p.to_string());
    }
}

#[test]
fn commutative_terms_compare_equal() {
    let x = Term::identifier("x", Some("f"), Type::C(CType::int()));
    let y = Term::identifier("y", Some("f"), Type::C(CType::int()));
    let xy = Term::binary(x.clone(), y.clone(), BinaryOperator::Plus).unwrap();
    let yx = Term::binary(y.clone(), x.clone(), BinaryOperator::Plus).unwrap();
    assert_eq!(xy, yx);

    let xy = Term::binary(x.clone(), y.clone(), BinaryOperator::Minus).unwrap();
    let yx = Term::binary(y, x, BinaryOperator::Minus).unwrap();
    assert_ne!(xy, yx);
}

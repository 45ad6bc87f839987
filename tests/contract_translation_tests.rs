//! End-to-end tests: annotations of a small C function are built, checked,
//! composed into contract obligations and translated into C conditions.
//!
//! ```c
//! /*@ requires x > -1000;
//!     behavior pos: assumes x >= 0; ensures \result == x;
//!     behavior neg: assumes x < 0;  ensures \result == -x;
//!     complete behaviors;
//!     disjoint behaviors;
//! */
//! int abs(int x);
//! ```

use acsl::ast::{BinaryOperator, Declaration, Label, Predicate, Term, UnaryOperator};
use acsl::contract::{Annotation, BehaviorBuilder, CompletenessKind, ContractBuilder};
use acsl::scope::MapScope;
use acsl::translate::{
    prepare, translate_predicate, PredicateToExpressionTreeVisitor, TermToCExpressionVisitor,
    TranslationOptions,
};
use acsl::wellformed::{identifiers_resolve, unresolved_identifiers};
use acsl::{Error, ErrorSeverity};
use std::sync::Arc;

fn int() -> acsl::Type {
    acsl::Type::C(acsl::CType::int())
}

fn x() -> Arc<Term> {
    Term::identifier("x", Some("abs"), int())
}

fn compare(left: Arc<Term>, op: BinaryOperator, right: Arc<Term>) -> Arc<Predicate> {
    Predicate::simple(Term::binary(left, right, op).unwrap()).unwrap()
}

fn abs_scope() -> MapScope {
    let mut scope = MapScope::with_functions([Declaration::Function {
        name: "abs".to_string(),
        return_type: acsl::CType::int(),
        params: vec![acsl::CType::int()],
    }]);
    scope.enter_block();
    scope.declare(Declaration::Variable {
        name: "x".to_string(),
        ty: acsl::CType::int(),
        function_name: Some("abs".to_string()),
    });
    scope
}

fn abs_contract() -> acsl::Contract {
    let minus_x = Arc::new(Term::Unary {
        op: UnaryOperator::Minus,
        operand: x(),
    });
    let pos = BehaviorBuilder::new("pos")
        .assumes(compare(x(), BinaryOperator::Geq, Term::int(0)))
        .ensures(compare(Term::result(int()), BinaryOperator::Eq, x()))
        .build()
        .unwrap();
    let neg = BehaviorBuilder::new("neg")
        .assumes(compare(x(), BinaryOperator::Lt, Term::int(0)))
        .ensures(compare(Term::result(int()), BinaryOperator::Eq, minus_x))
        .build()
        .unwrap();
    ContractBuilder::new()
        .requires(compare(x(), BinaryOperator::Gt, Term::int(-1000)))
        .behavior(pos)
        .behavior(neg)
        .completeness(CompletenessKind::Complete, Vec::<String>::new())
        .completeness(CompletenessKind::Disjoint, Vec::<String>::new())
        .build()
        .unwrap()
}

#[test]
fn test_pre_state_of_abs() {
    let contract = abs_contract();
    // unguarded requires, both behaviors without requires, and the
    // completeness clauses over x >= 0 / x < 0 all fold away
    let pre = contract.for_pre_state().predicate_representation();
    assert_eq!(pre.to_string(), "x > -1000");

    let scope = abs_scope();
    assert!(identifiers_resolve(&pre, &scope));
    let translation = translate_predicate(&pre, &scope, TranslationOptions::default()).unwrap();
    assert!(translation.old_values.is_empty());
    assert_eq!(translation.tree.to_string(), "x > -1000");
}

#[test]
fn test_post_state_of_abs_reads_pre_state_guards() {
    let contract = abs_contract();
    let post = contract.post_state_predicate();
    assert_eq!(
        post.to_string(),
        "((\\result == x || !\\old(x >= 0)) && (\\result == -(x) || !\\old(x < 0)))"
    );

    let scope = abs_scope();
    let translation = translate_predicate(&post, &scope, TranslationOptions::default()).unwrap();
    let snapshots: Vec<String> = translation
        .old_values
        .iter()
        .map(|v| format!("{} = {}", v.temporary, v.initializer))
        .collect();
    assert_eq!(snapshots, vec!["__old_0 = x", "__old_1 = x"]);
    assert_eq!(
        translation.tree.to_string(),
        "((__retval__ == x || !(__old_0 >= 0)) && (__retval__ == -x || !(__old_1 < 0)))"
    );
}

#[test]
fn test_old_term_snapshot_order() {
    // ensures \result == \old(x) + 1
    let old_x = Term::old(x());
    let incremented = Term::binary(old_x, Term::int(1), BinaryOperator::Plus).unwrap();
    let ensures = compare(Term::result(int()), BinaryOperator::Eq, incremented);
    let contract = ContractBuilder::new().ensures(ensures).build().unwrap();
    let post = contract.predicate_representation();

    let scope = abs_scope();
    let options = TranslationOptions {
        result_variable: "ret".to_string(),
        old_value_prefix: "pre_".to_string(),
        ..TranslationOptions::default()
    };
    let prepared = prepare(&post, &options);
    let mut terms = TermToCExpressionVisitor::new(&scope, options);
    let old_values = terms.snapshot_old_values(&prepared).unwrap();
    assert_eq!(old_values.len(), 1);
    assert_eq!(old_values[0].temporary.to_string(), "pre_0");

    let mut visitor = PredicateToExpressionTreeVisitor::new(terms);
    let tree = visitor.translate(&prepared).unwrap();
    assert_eq!(tree.to_expression().to_string(), "ret == (pre_0 + 1)");
}

#[test]
fn test_unresolved_identifier_is_recoverable() {
    let y = Term::identifier("y", Some("abs"), int());
    let assertion =
        Annotation::assertion(vec![], &compare(x(), BinaryOperator::Lt, y)).unwrap();
    let p = assertion.predicate_representation();

    let scope = abs_scope();
    assert_eq!(unresolved_identifiers(&p, &scope), vec!["y".to_string()]);

    let err = translate_predicate(&p, &scope, TranslationOptions::default()).unwrap_err();
    assert_eq!(err.classify(), ErrorSeverity::Recoverable);
    assert!(err.is_input_error());
}

#[test]
fn test_unsupported_label_is_reported() {
    let invariant = Annotation::loop_invariant(
        vec![],
        &Predicate::at(
            compare(x(), BinaryOperator::Geq, Term::int(0)),
            Label::LoopEntry,
        ),
    )
    .unwrap();
    let scope = abs_scope();
    let err = translate_predicate(
        &invariant.predicate_representation(),
        &scope,
        TranslationOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
}

#[test]
fn test_misplaced_result_is_rejected() {
    let err = ContractBuilder::new()
        .requires(compare(Term::result(int()), BinaryOperator::Gt, Term::int(0)))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::IllegalPlacement { .. }));
    assert_eq!(err.classify(), ErrorSeverity::Fatal);
}

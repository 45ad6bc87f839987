//! Binder substitution for `\forall` / `\exists`.
//!
//! Rewrites free identifiers captured by a quantifier's binders into bound
//! identifiers. The pass is a pure tree rewrite: nothing outside the returned
//! tree changes, subtrees without captured names are shared with the input,
//! and identifiers that no binder declares are returned untouched.
//!
//! When several binders declare the same name, the first binder in the
//! supplied order decides the bound identifier's type.

use std::sync::Arc;

use crate::ast::{Binder, BoundIdentifier, Predicate, Quantifier, Term};
use crate::error::Result;

/// Active binders of one quantifier instance
struct Binding<'b> {
    binders: &'b [Binder],
    quantifier: Quantifier,
    function_name: Option<&'b str>,
}

impl Binding<'_> {
    fn capture(&self, name: &str) -> Option<&Binder> {
        let mut matching = self.binders.iter().filter(|b| b.binds(name));
        let first = matching.next()?;
        if matching.next().is_some() {
            tracing::debug!(
                "identifier {} is declared by several binders of one {}; using type {}",
                name,
                self.quantifier,
                first.ty
            );
        }
        Some(first)
    }

    fn term(&self, term: &Arc<Term>) -> Result<Arc<Term>> {
        match term.as_ref() {
            Term::Identifier(id) => Ok(match self.capture(&id.name) {
                Some(binder) => Arc::new(Term::BoundIdentifier(BoundIdentifier {
                    name: id.name.clone(),
                    function_name: self.function_name.map(str::to_string),
                    ty: binder.ty.clone(),
                    quantifier: self.quantifier,
                })),
                None => Arc::clone(term),
            }),

            Term::IntegerLiteral(_)
            | Term::RealLiteral(_)
            | Term::CharLiteral(_)
            | Term::StringLiteral(_)
            | Term::BooleanLiteral(_)
            | Term::BoundIdentifier(_)
            | Term::Result { .. } => Ok(Arc::clone(term)),

            Term::ArrayAccess { array, index } => {
                let (a, i) = (self.term(array)?, self.term(index)?);
                if Arc::ptr_eq(&a, array) && Arc::ptr_eq(&i, index) {
                    return Ok(Arc::clone(term));
                }
                Ok(Arc::new(Term::ArrayAccess { array: a, index: i }))
            }
            Term::Binary(binary) => {
                let (l, r) = (self.term(binary.left())?, self.term(binary.right())?);
                if Arc::ptr_eq(&l, binary.left()) && Arc::ptr_eq(&r, binary.right()) {
                    return Ok(Arc::clone(term));
                }
                Ok(Arc::new(Term::Binary(binary.with_operands(l, r)?)))
            }
            Term::Unary { op, operand } => {
                let o = self.term(operand)?;
                if Arc::ptr_eq(&o, operand) {
                    return Ok(Arc::clone(term));
                }
                Ok(Arc::new(Term::Unary { op: *op, operand: o }))
            }
            Term::Cast { ty, term: inner } => {
                let t = self.term(inner)?;
                if Arc::ptr_eq(&t, inner) {
                    return Ok(Arc::clone(term));
                }
                Ok(Arc::new(Term::Cast {
                    ty: ty.clone(),
                    term: t,
                }))
            }
            Term::At { inner, label } => {
                let t = self.term(inner)?;
                if Arc::ptr_eq(&t, inner) {
                    return Ok(Arc::clone(term));
                }
                Ok(Term::at(t, label.clone()))
            }
            Term::FunctionCall { name, args, ty } => {
                let bound = args
                    .iter()
                    .map(|a| self.term(a))
                    .collect::<Result<Vec<_>>>()?;
                if bound.iter().zip(args).all(|(b, a)| Arc::ptr_eq(b, a)) {
                    return Ok(Arc::clone(term));
                }
                Ok(Arc::new(Term::FunctionCall {
                    name: name.clone(),
                    args: bound,
                    ty: ty.clone(),
                }))
            }
        }
    }

    fn predicate(&self, predicate: &Arc<Predicate>) -> Result<Arc<Predicate>> {
        match predicate.as_ref() {
            Predicate::True | Predicate::False => Ok(Arc::clone(predicate)),
            Predicate::Simple(simple) => {
                let t = self.term(simple.term())?;
                if Arc::ptr_eq(&t, simple.term()) {
                    return Ok(Arc::clone(predicate));
                }
                let rebuilt = Predicate::simple(t)?;
                Ok(if simple.is_negated() {
                    rebuilt.negated()
                } else {
                    rebuilt
                })
            }
            Predicate::Logical(logical) => {
                let (l, r) = (self.predicate(&logical.left)?, self.predicate(&logical.right)?);
                if Arc::ptr_eq(&l, &logical.left) && Arc::ptr_eq(&r, &logical.right) {
                    return Ok(Arc::clone(predicate));
                }
                Ok(Predicate::connect(l, r, logical.op, logical.negated))
            }
            Predicate::Ternary {
                condition,
                then,
                otherwise,
                negated,
            } => {
                let c = self.predicate(condition)?;
                let t = self.predicate(then)?;
                let e = self.predicate(otherwise)?;
                if Arc::ptr_eq(&c, condition) && Arc::ptr_eq(&t, then) && Arc::ptr_eq(&e, otherwise)
                {
                    return Ok(Arc::clone(predicate));
                }
                Ok(Arc::new(Predicate::Ternary {
                    condition: c,
                    then: t,
                    otherwise: e,
                    negated: *negated,
                }))
            }
            // Names of the inner quantifier were bound when it was built
            Predicate::Quantified {
                quantifier,
                binders,
                body,
                negated,
            } => {
                let b = self.predicate(body)?;
                if Arc::ptr_eq(&b, body) {
                    return Ok(Arc::clone(predicate));
                }
                Ok(Arc::new(Predicate::Quantified {
                    quantifier: *quantifier,
                    binders: binders.clone(),
                    body: b,
                    negated: *negated,
                }))
            }
            Predicate::At {
                inner,
                label,
                negated,
            } => {
                let i = self.predicate(inner)?;
                if Arc::ptr_eq(&i, inner) {
                    return Ok(Arc::clone(predicate));
                }
                Ok(Arc::new(Predicate::At {
                    inner: i,
                    label: label.clone(),
                    negated: *negated,
                }))
            }
        }
    }
}

/// Replace identifiers declared by `binders` in a term with bound identifiers
///
/// Fails only when a bound variable's type cannot be combined with the
/// operator around it, which points at a converter bug.
pub fn bind_term(
    term: &Arc<Term>,
    binders: &[Binder],
    quantifier: Quantifier,
    function_name: Option<&str>,
) -> Result<Arc<Term>> {
    Binding {
        binders,
        quantifier,
        function_name,
    }
    .term(term)
}

/// Replace identifiers declared by `binders` in a predicate with bound identifiers
pub fn bind_predicate(
    predicate: &Arc<Predicate>,
    binders: &[Binder],
    quantifier: Quantifier,
    function_name: Option<&str>,
) -> Result<Arc<Predicate>> {
    Binding {
        binders,
        quantifier,
        function_name,
    }
    .predicate(predicate)
}

impl Predicate {
    /// `\forall` / `\exists` over `binders`, binding the body's free identifiers
    pub fn quantified(
        quantifier: Quantifier,
        binders: Vec<Binder>,
        body: &Arc<Predicate>,
        function_name: Option<&str>,
    ) -> Result<Arc<Predicate>> {
        let bound = bind_predicate(body, &binders, quantifier, function_name)?;
        Ok(Predicate::quantified_unchecked(quantifier, binders, bound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator;
    use crate::types::{CType, Type};

    fn var(name: &str) -> Arc<Term> {
        Term::identifier(name, Some("sum"), Type::C(CType::int()))
    }

    fn bound(name: &str, ty: Type, quantifier: Quantifier) -> Arc<Term> {
        Arc::new(Term::BoundIdentifier(BoundIdentifier {
            name: name.to_string(),
            function_name: Some("sum".to_string()),
            ty,
            quantifier,
        }))
    }

    #[test]
    fn test_captured_identifier_becomes_bound() {
        let binders = vec![Binder::new(Type::integer(), ["i"])];
        let access = Arc::new(Term::ArrayAccess {
            array: var("a"),
            index: var("i"),
        });
        let result = bind_term(&access, &binders, Quantifier::ForAll, Some("sum")).unwrap();
        let expected = Arc::new(Term::ArrayAccess {
            array: var("a"),
            index: bound("i", Type::integer(), Quantifier::ForAll),
        });
        assert_eq!(result, expected);
    }

    #[test]
    fn test_uncaptured_tree_is_shared() {
        let binders = vec![Binder::new(Type::integer(), ["k"])];
        let p = Predicate::simple(Term::binary(var("x"), var("y"), BinaryOperator::Lt).unwrap())
            .unwrap();
        let result = bind_predicate(&p, &binders, Quantifier::Exists, Some("sum")).unwrap();
        assert!(Arc::ptr_eq(&result, &p));
    }

    #[test]
    fn test_first_binder_wins() {
        let binders = vec![
            Binder::new(Type::integer(), ["i"]),
            Binder::new(Type::real(), ["i", "j"]),
        ];
        let result = bind_term(&var("i"), &binders, Quantifier::ForAll, Some("sum")).unwrap();
        assert_eq!(result, bound("i", Type::integer(), Quantifier::ForAll));
        let result = bind_term(&var("j"), &binders, Quantifier::ForAll, Some("sum")).unwrap();
        assert_eq!(result, bound("j", Type::real(), Quantifier::ForAll));
    }

    #[test]
    fn test_binding_is_pure_and_repeatable() {
        let binders = vec![Binder::new(Type::integer(), ["i"])];
        let body = Predicate::simple(
            Term::binary(var("i"), var("n"), BinaryOperator::Lt).unwrap(),
        )
        .unwrap()
        .negated();
        let first = bind_predicate(&body, &binders, Quantifier::ForAll, Some("sum")).unwrap();
        let second = bind_predicate(&body, &binders, Quantifier::ForAll, Some("sum")).unwrap();
        assert_eq!(first, second);
        assert!(first.is_negated());
        assert_eq!(first.to_string(), "!(i < n)");
        // input untouched
        assert!(matches!(
            body.as_ref(),
            Predicate::Simple(s) if matches!(
                s.term().as_comparison().unwrap().left().as_ref(),
                Term::Identifier(_)
            )
        ));
    }

    #[test]
    fn test_nested_quantifier_keeps_inner_binding() {
        let inner_binders = vec![Binder::new(Type::integer(), ["j"])];
        let body = Predicate::simple(
            Term::binary(var("i"), var("j"), BinaryOperator::Leq).unwrap(),
        )
        .unwrap();
        let inner =
            Predicate::quantified(Quantifier::Exists, inner_binders, &body, Some("sum")).unwrap();
        let outer = Predicate::quantified(
            Quantifier::ForAll,
            vec![Binder::new(Type::integer(), ["i", "j"])],
            &inner,
            Some("sum"),
        )
        .unwrap();

        let Predicate::Quantified { body: outer_body, .. } = outer.as_ref() else {
            panic!("expected quantified predicate");
        };
        let Predicate::Quantified { body: inner_body, .. } = outer_body.as_ref() else {
            panic!("expected nested quantified predicate");
        };
        let Predicate::Simple(simple) = inner_body.as_ref() else {
            panic!("expected comparison");
        };
        let comparison = simple.term().as_comparison().unwrap();
        assert_eq!(
            comparison.left(),
            &bound("i", Type::integer(), Quantifier::ForAll)
        );
        assert_eq!(
            comparison.right(),
            &bound("j", Type::integer(), Quantifier::Exists)
        );
    }
}

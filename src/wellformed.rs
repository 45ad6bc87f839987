//! Well-formedness checks on annotation trees.
//!
//! Two read-only passes:
//!
//! 1. **Builtin collection**: gathers the builtin markers (`\result`,
//!    `\old`, `\at`) a tree references, so clause-placement rules can be
//!    checked independently of the structural [`Predicate::is_allowed_in`].
//! 2. **Identifier resolution**: checks every free identifier and called
//!    function against a [`Scope`]. A failed lookup makes the predicate
//!    "not resolvable"; it is never an error.

use std::collections::BTreeSet;

use crate::ast::{Builtin, ClauseKind, Predicate, Term};
use crate::error::{Error, Result};
use crate::scope::Scope;

/// Builtin markers referenced anywhere in a term
pub fn collect_term_builtins(term: &Term) -> BTreeSet<Builtin> {
    let mut builtins = BTreeSet::new();
    walk_term(term, &mut |t| {
        if let Some(b) = t.builtin() {
            builtins.insert(b);
        }
    });
    builtins
}

/// Builtin markers referenced anywhere in a predicate
pub fn collect_builtins(predicate: &Predicate) -> BTreeSet<Builtin> {
    let mut builtins = BTreeSet::new();
    walk_predicate(predicate, &mut |p| {
        if let Some(b) = p.builtin() {
            builtins.insert(b);
        }
    });
    walk_predicate_terms(predicate, &mut |t| {
        if let Some(b) = t.builtin() {
            builtins.insert(b);
        }
    });
    builtins
}

/// Check that `predicate` may appear in a `clause`
///
/// Both the structural check and the collected builtins must agree.
pub fn check_placement(predicate: &Predicate, clause: ClauseKind) -> Result<()> {
    if let Some(builtin) = collect_builtins(predicate)
        .into_iter()
        .find(|b| !b.is_allowed_in(clause))
    {
        return Err(Error::IllegalPlacement {
            builtin: builtin.to_string(),
            clause: clause.to_string(),
        });
    }
    if !predicate.is_allowed_in(clause) {
        return Err(Error::IllegalPlacement {
            builtin: predicate.to_string(),
            clause: clause.to_string(),
        });
    }
    Ok(())
}

/// Names in `predicate` that `scope` cannot resolve, in first-seen order
///
/// Function names are reported with a trailing `()`.
pub fn unresolved_identifiers(predicate: &Predicate, scope: &dyn Scope) -> Vec<String> {
    let mut unresolved: Vec<String> = Vec::new();
    walk_predicate_terms(predicate, &mut |t| {
        let missing = match t {
            Term::Identifier(id) if scope.lookup_variable(&id.name).is_none() => {
                Some(id.name.clone())
            }
            Term::FunctionCall { name, .. } if scope.lookup_function(name).is_none() => {
                Some(format!("{}()", name))
            }
            _ => None,
        };
        if let Some(name) = missing {
            if !unresolved.contains(&name) {
                unresolved.push(name);
            }
        }
    });
    if !unresolved.is_empty() {
        tracing::debug!("unresolved identifiers in {}: {:?}", predicate, unresolved);
    }
    unresolved
}

/// True iff every identifier and function in `predicate` is declared in `scope`
pub fn identifiers_resolve(predicate: &Predicate, scope: &dyn Scope) -> bool {
    unresolved_identifiers(predicate, scope).is_empty()
}

fn walk_term<'t>(term: &'t Term, visit: &mut dyn FnMut(&'t Term)) {
    visit(term);
    for child in term.children() {
        walk_term(child, visit);
    }
}

fn walk_predicate<'p>(predicate: &'p Predicate, visit: &mut dyn FnMut(&'p Predicate)) {
    visit(predicate);
    match predicate {
        Predicate::True | Predicate::False | Predicate::Simple(_) => {}
        Predicate::Logical(logical) => {
            walk_predicate(&logical.left, visit);
            walk_predicate(&logical.right, visit);
        }
        Predicate::Ternary {
            condition,
            then,
            otherwise,
            ..
        } => {
            walk_predicate(condition, visit);
            walk_predicate(then, visit);
            walk_predicate(otherwise, visit);
        }
        Predicate::Quantified { body, .. } => walk_predicate(body, visit),
        Predicate::At { inner, .. } => walk_predicate(inner, visit),
    }
}

/// Every term node under the simple predicates of `predicate`
pub(crate) fn walk_predicate_terms<'p>(predicate: &'p Predicate, visit: &mut dyn FnMut(&'p Term)) {
    walk_predicate(predicate, &mut |p| {
        if let Predicate::Simple(simple) = p {
            walk_term(simple.term(), visit);
        }
    });
}

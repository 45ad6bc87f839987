//! `complete behaviors` / `disjoint behaviors` clauses

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::Behavior;
use crate::ast::Predicate;
use crate::simplify::simplify;

/// Relation a completeness clause imposes on its behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompletenessKind {
    /// The guards jointly cover every state
    Complete,
    /// The guards are pairwise mutually exclusive
    Disjoint,
}

impl fmt::Display for CompletenessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletenessKind::Complete => write!(f, "complete behaviors"),
            CompletenessKind::Disjoint => write!(f, "disjoint behaviors"),
        }
    }
}

/// Completeness or disjointness over a list of behaviors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessClause {
    kind: CompletenessKind,
    behaviors: Vec<Behavior>,
}

impl CompletenessClause {
    /// Clause over the given behaviors
    pub fn new(kind: CompletenessKind, behaviors: Vec<Behavior>) -> Self {
        CompletenessClause { kind, behaviors }
    }

    /// `complete behaviors b1, ..., bn;`
    pub fn complete(behaviors: Vec<Behavior>) -> Self {
        Self::new(CompletenessKind::Complete, behaviors)
    }

    /// `disjoint behaviors b1, ..., bn;`
    pub fn disjoint(behaviors: Vec<Behavior>) -> Self {
        Self::new(CompletenessKind::Disjoint, behaviors)
    }

    /// Relation kind
    pub fn kind(&self) -> CompletenessKind {
        self.kind
    }

    /// Behaviors the clause ranges over
    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Pre-state obligation expressed by this clause
    ///
    /// Complete: `A1 || ... || An`. Disjoint: `!(Ai && Aj)` for every
    /// unordered pair `i < j`, conjoined.
    pub fn predicate(&self) -> Arc<Predicate> {
        let guards: Vec<&Arc<Predicate>> = self.behaviors.iter().map(|b| b.assumes()).collect();
        let combined = match self.kind {
            CompletenessKind::Complete => guards
                .iter()
                .fold(Predicate::falsehood(), |acc, a| Predicate::or(acc, Arc::clone(a))),
            CompletenessKind::Disjoint => {
                let mut acc = Predicate::truth();
                for (i, first) in guards.iter().enumerate() {
                    for second in &guards[i + 1..] {
                        let exclusive =
                            Predicate::and(Arc::clone(first), Arc::clone(second)).negated();
                        acc = Predicate::and(acc, exclusive);
                    }
                }
                acc
            }
        };
        simplify(&combined)
    }
}

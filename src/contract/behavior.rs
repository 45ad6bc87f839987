//! Named behaviors: `behavior b: assumes A; requires R; ensures E;`

use serde::Serialize;
use std::sync::Arc;

use crate::ast::{ClauseKind, Predicate};
use crate::error::Result;
use crate::simplify::simplify;
use crate::wellformed::check_placement;

/// A guard-conditional contract fragment
///
/// Clauses are simplified once, when the behavior is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Behavior {
    name: String,
    requires: Arc<Predicate>,
    ensures: Arc<Predicate>,
    assumes: Arc<Predicate>,
}

impl Behavior {
    /// Build a behavior, checking clause placement
    pub fn new(
        name: impl Into<String>,
        requires: Arc<Predicate>,
        ensures: Arc<Predicate>,
        assumes: Arc<Predicate>,
    ) -> Result<Self> {
        check_placement(&requires, ClauseKind::Requires)?;
        check_placement(&ensures, ClauseKind::Ensures)?;
        check_placement(&assumes, ClauseKind::Assumes)?;
        Ok(Behavior {
            name: name.into(),
            requires: simplify(&requires),
            ensures: simplify(&ensures),
            assumes: simplify(&assumes),
        })
    }

    /// Behavior name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Simplified `requires` clause
    pub fn requires(&self) -> &Arc<Predicate> {
        &self.requires
    }

    /// Simplified `ensures` clause
    pub fn ensures(&self) -> &Arc<Predicate> {
        &self.ensures
    }

    /// Simplified `assumes` guard
    pub fn assumes(&self) -> &Arc<Predicate> {
        &self.assumes
    }

    /// `requires || !assumes`: the precondition only binds when the guard holds
    pub fn pre_state_predicate(&self) -> Arc<Predicate> {
        simplify(&Predicate::or(
            Arc::clone(&self.requires),
            self.assumes.negated(),
        ))
    }

    /// `ensures || !\old(assumes)`: the guard is evaluated in the pre-state
    pub fn post_state_predicate(&self) -> Arc<Predicate> {
        simplify(&Predicate::or(
            Arc::clone(&self.ensures),
            Predicate::old(Arc::clone(&self.assumes)).negated(),
        ))
    }
}

/// Accumulates behavior clauses; repeated clauses are conjoined
#[derive(Debug, Clone)]
pub struct BehaviorBuilder {
    name: String,
    requires: Arc<Predicate>,
    ensures: Arc<Predicate>,
    assumes: Arc<Predicate>,
}

impl BehaviorBuilder {
    /// Start a behavior; missing clauses default to `\true`
    pub fn new(name: impl Into<String>) -> Self {
        BehaviorBuilder {
            name: name.into(),
            requires: Predicate::truth(),
            ensures: Predicate::truth(),
            assumes: Predicate::truth(),
        }
    }

    /// Add a `requires` clause
    pub fn requires(mut self, clause: Arc<Predicate>) -> Self {
        self.requires = conjoin(self.requires, clause);
        self
    }

    /// Add an `ensures` clause
    pub fn ensures(mut self, clause: Arc<Predicate>) -> Self {
        self.ensures = conjoin(self.ensures, clause);
        self
    }

    /// Add an `assumes` clause
    pub fn assumes(mut self, clause: Arc<Predicate>) -> Self {
        self.assumes = conjoin(self.assumes, clause);
        self
    }

    /// Build the behavior
    pub fn build(self) -> Result<Behavior> {
        Behavior::new(self.name, self.requires, self.ensures, self.assumes)
    }
}

fn conjoin(acc: Arc<Predicate>, clause: Arc<Predicate>) -> Arc<Predicate> {
    if acc.is_true() {
        clause
    } else {
        Predicate::and(acc, clause)
    }
}

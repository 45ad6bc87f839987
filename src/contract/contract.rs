//! Function and statement contracts

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use super::{Behavior, CompletenessClause, CompletenessKind};
use crate::ast::{ClauseKind, Predicate};
use crate::error::{Error, Result};
use crate::simplify::simplify;
use crate::wellformed::check_placement;

/// Which program state a contract is being looked at from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StateView {
    /// Entry of the function or statement: requires, behavior preconditions, completeness
    Pre,
    /// Exit of the function or statement: ensures and behavior postconditions
    Post,
}

/// Requires/ensures clauses plus named behaviors and completeness clauses
///
/// A contract is immutable. [`Contract::for_pre_state`] and
/// [`Contract::for_post_state`] return copies that differ only in which state
/// [`Contract::predicate_representation`] describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    requires: Arc<Predicate>,
    ensures: Arc<Predicate>,
    behaviors: Vec<Behavior>,
    completeness: Vec<CompletenessClause>,
    view: StateView,
}

impl Contract {
    /// Build a contract, checking placement and simplifying the top-level clauses
    ///
    /// The contract initially represents its post-state.
    pub fn new(
        requires: Arc<Predicate>,
        ensures: Arc<Predicate>,
        behaviors: Vec<Behavior>,
        completeness: Vec<CompletenessClause>,
    ) -> Result<Self> {
        check_placement(&requires, ClauseKind::Requires)?;
        check_placement(&ensures, ClauseKind::Ensures)?;
        Ok(Contract {
            requires: simplify(&requires),
            ensures: simplify(&ensures),
            behaviors,
            completeness,
            view: StateView::Post,
        })
    }

    /// Simplified top-level `requires`
    pub fn requires(&self) -> &Arc<Predicate> {
        &self.requires
    }

    /// Simplified top-level `ensures`
    pub fn ensures(&self) -> &Arc<Predicate> {
        &self.ensures
    }

    /// Declared behaviors
    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Completeness and disjointness clauses
    pub fn completeness_clauses(&self) -> &[CompletenessClause] {
        &self.completeness
    }

    /// Behavior by name
    pub fn behavior(&self, name: &str) -> Option<&Behavior> {
        self.behaviors.iter().find(|b| b.name() == name)
    }

    /// State this copy represents
    pub fn view(&self) -> StateView {
        self.view
    }

    /// Obligation at entry
    pub fn pre_state_predicate(&self) -> Arc<Predicate> {
        let mut acc = Arc::clone(&self.requires);
        for behavior in &self.behaviors {
            acc = Predicate::and(acc, behavior.pre_state_predicate());
        }
        for clause in &self.completeness {
            acc = Predicate::and(acc, clause.predicate());
        }
        tracing::trace!("pre-state of contract: {}", acc);
        simplify(&acc)
    }

    /// Obligation at exit
    pub fn post_state_predicate(&self) -> Arc<Predicate> {
        let mut acc = Arc::clone(&self.ensures);
        for behavior in &self.behaviors {
            acc = Predicate::and(acc, behavior.post_state_predicate());
        }
        tracing::trace!("post-state of contract: {}", acc);
        simplify(&acc)
    }

    /// Copy representing the pre-state
    pub fn for_pre_state(&self) -> Contract {
        Contract {
            view: StateView::Pre,
            ..self.clone()
        }
    }

    /// Copy representing the post-state
    pub fn for_post_state(&self) -> Contract {
        Contract {
            view: StateView::Post,
            ..self.clone()
        }
    }

    /// Predicate for the state this copy represents
    pub fn predicate_representation(&self) -> Arc<Predicate> {
        match self.view {
            StateView::Pre => self.pre_state_predicate(),
            StateView::Post => self.post_state_predicate(),
        }
    }
}

/// Accumulates contract clauses in source order
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    requires: Arc<Predicate>,
    ensures: Arc<Predicate>,
    behaviors: Vec<Behavior>,
    completeness: Vec<(CompletenessKind, Vec<String>)>,
}

impl ContractBuilder {
    /// Empty contract; missing clauses default to `\true`
    pub fn new() -> Self {
        ContractBuilder {
            requires: Predicate::truth(),
            ensures: Predicate::truth(),
            behaviors: Vec::new(),
            completeness: Vec::new(),
        }
    }

    /// Add a `requires` clause
    pub fn requires(mut self, clause: Arc<Predicate>) -> Self {
        self.requires = if self.requires.is_true() {
            clause
        } else {
            Predicate::and(self.requires, clause)
        };
        self
    }

    /// Add an `ensures` clause
    pub fn ensures(mut self, clause: Arc<Predicate>) -> Self {
        self.ensures = if self.ensures.is_true() {
            clause
        } else {
            Predicate::and(self.ensures, clause)
        };
        self
    }

    /// Add a named behavior
    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Add a completeness clause over behavior names
    ///
    /// An empty name list ranges over every behavior of the contract.
    pub fn completeness<S: Into<String>>(
        mut self,
        kind: CompletenessKind,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.completeness
            .push((kind, names.into_iter().map(Into::into).collect()));
        self
    }

    /// Resolve behavior names and build the contract
    pub fn build(self) -> Result<Contract> {
        let mut clauses = Vec::with_capacity(self.completeness.len());
        for (kind, names) in &self.completeness {
            let behaviors = if names.is_empty() {
                self.behaviors.clone()
            } else {
                let mut seen = HashSet::with_capacity(names.len());
                names
                    .iter()
                    .map(|name| {
                        if !seen.insert(name.as_str()) {
                            return Err(Error::unrecognized(
                                name,
                                format!("behavior listed twice in {}", kind),
                            ));
                        }
                        self.behaviors
                            .iter()
                            .find(|b| b.name() == name)
                            .cloned()
                            .ok_or_else(|| Error::unrecognized(name, format!("unknown behavior in {}", kind)))
                    })
                    .collect::<Result<Vec<_>>>()?
            };
            clauses.push(CompletenessClause::new(*kind, behaviors));
        }
        Contract::new(self.requires, self.ensures, self.behaviors, clauses)
    }
}

impl Default for ContractBuilder {
    fn default() -> Self {
        Self::new()
    }
}

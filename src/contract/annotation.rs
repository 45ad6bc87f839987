//! Annotations attached to functions and statements

use serde::Serialize;
use std::sync::Arc;

use super::Contract;
use crate::ast::{ClauseKind, Predicate};
use crate::error::Result;
use crate::simplify::simplify;
use crate::wellformed::check_placement;

/// An ACSL annotation
///
/// Statement-level annotations may be restricted to a set of enclosing
/// behaviors (`for b1, b2: assert p;`). An empty list means all behaviors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Annotation {
    /// Contract preceding a function
    FunctionContract(Contract),
    /// Contract preceding a statement
    StatementContract {
        /// Enclosing behaviors the contract applies to
        for_behaviors: Vec<String>,
        /// The contract itself
        contract: Contract,
    },
    /// `assert p;`
    Assertion {
        /// Enclosing behaviors the assertion applies to
        for_behaviors: Vec<String>,
        /// Asserted predicate, simplified
        predicate: Arc<Predicate>,
    },
    /// `loop invariant p;`
    LoopInvariant {
        /// Enclosing behaviors the invariant applies to
        for_behaviors: Vec<String>,
        /// Invariant, simplified
        predicate: Arc<Predicate>,
    },
}

impl Annotation {
    /// Function contract annotation
    pub fn function_contract(contract: Contract) -> Self {
        Annotation::FunctionContract(contract)
    }

    /// Statement contract restricted to `for_behaviors`
    pub fn statement_contract(for_behaviors: Vec<String>, contract: Contract) -> Self {
        Annotation::StatementContract {
            for_behaviors,
            contract,
        }
    }

    /// `assert` annotation
    pub fn assertion(for_behaviors: Vec<String>, predicate: &Arc<Predicate>) -> Result<Self> {
        check_placement(predicate, ClauseKind::Assertion)?;
        Ok(Annotation::Assertion {
            for_behaviors,
            predicate: simplify(predicate),
        })
    }

    /// `loop invariant` annotation
    pub fn loop_invariant(for_behaviors: Vec<String>, predicate: &Arc<Predicate>) -> Result<Self> {
        check_placement(predicate, ClauseKind::LoopInvariant)?;
        Ok(Annotation::LoopInvariant {
            for_behaviors,
            predicate: simplify(predicate),
        })
    }

    /// Behaviors this annotation is restricted to; empty for all
    pub fn for_behaviors(&self) -> &[String] {
        match self {
            Annotation::FunctionContract(_) => &[],
            Annotation::StatementContract { for_behaviors, .. }
            | Annotation::Assertion { for_behaviors, .. }
            | Annotation::LoopInvariant { for_behaviors, .. } => for_behaviors,
        }
    }

    /// Clause kind the annotation's own predicate occupies
    pub fn clause_kind(&self) -> Option<ClauseKind> {
        match self {
            Annotation::Assertion { .. } => Some(ClauseKind::Assertion),
            Annotation::LoopInvariant { .. } => Some(ClauseKind::LoopInvariant),
            _ => None,
        }
    }

    /// Single predicate this annotation stands for
    ///
    /// Contracts report the state view they were built or copied with.
    pub fn predicate_representation(&self) -> Arc<Predicate> {
        match self {
            Annotation::FunctionContract(contract)
            | Annotation::StatementContract { contract, .. } => {
                contract.predicate_representation()
            }
            Annotation::Assertion { predicate, .. }
            | Annotation::LoopInvariant { predicate, .. } => Arc::clone(predicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, Label, Term};
    use crate::contract::ContractBuilder;
    use crate::error::Error;
    use crate::types::{CType, Type};

    fn cmp(name: &str, op: BinaryOperator, value: i128) -> Arc<Predicate> {
        let var = Term::identifier(name, Some("f"), Type::C(CType::int()));
        Predicate::simple(Term::binary(var, Term::int(value), op).unwrap()).unwrap()
    }

    #[test]
    fn test_assertion_is_simplified() {
        let p = cmp("x", BinaryOperator::Eq, 10).negated();
        let assertion = Annotation::assertion(vec!["pos".to_string()], &p).unwrap();
        assert_eq!(
            assertion.predicate_representation(),
            cmp("x", BinaryOperator::Neq, 10)
        );
        assert_eq!(assertion.for_behaviors(), ["pos".to_string()]);
        assert_eq!(assertion.clause_kind(), Some(ClauseKind::Assertion));
    }

    #[test]
    fn test_loop_labels_only_in_invariants() {
        let at_entry = Predicate::at(cmp("i", BinaryOperator::Geq, 0), Label::LoopEntry);
        assert!(Annotation::loop_invariant(vec![], &at_entry).is_ok());
        let err = Annotation::assertion(vec![], &at_entry).unwrap_err();
        assert!(matches!(err, Error::IllegalPlacement { .. }));
    }

    #[test]
    fn test_contract_annotations_follow_view() {
        let contract = ContractBuilder::new()
            .requires(cmp("x", BinaryOperator::Gt, 0))
            .ensures(cmp("y", BinaryOperator::Gt, 0))
            .build()
            .unwrap();
        let post = Annotation::function_contract(contract.clone());
        assert_eq!(post.predicate_representation(), cmp("y", BinaryOperator::Gt, 0));
        assert!(post.for_behaviors().is_empty());

        let pre = Annotation::statement_contract(vec!["b".to_string()], contract.for_pre_state());
        assert_eq!(pre.predicate_representation(), cmp("x", BinaryOperator::Gt, 0));
        assert_eq!(pre.for_behaviors().len(), 1);
        assert_eq!(pre.clause_kind(), None);
    }
}

//! # Contracts
//!
//! Composition of annotation clauses into the single predicates a verifier
//! checks:
//!
//! - [`Behavior`]: `requires || !assumes` at entry, `ensures || !\old(assumes)` at exit
//! - [`CompletenessClause`]: guards that cover every state, or never overlap
//! - [`Contract`]: top-level clauses plus behaviors, viewed at entry or exit
//! - [`Annotation`]: contracts, assertions and loop invariants
//!
//! Every clause is checked for builtin placement and simplified once, when
//! it is built.

pub mod annotation;
pub mod behavior;
pub mod completeness;
#[allow(clippy::module_inception)]
pub mod contract;

pub use annotation::Annotation;
pub use behavior::{Behavior, BehaviorBuilder};
pub use completeness::{CompletenessClause, CompletenessKind};
pub use contract::{Contract, ContractBuilder, StateView};

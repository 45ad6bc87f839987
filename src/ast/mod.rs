//! # ACSL Abstract Syntax
//!
//! The closed node hierarchy every other module operates on. Nodes are
//! immutable and shared through [`Arc`](std::sync::Arc); transforms return
//! new trees that reuse unchanged subtrees.
//!
//! ```text
//! Term        literals, identifiers, \result, a[i], binary/unary terms,
//!             casts, \at / \old, function calls
//! Predicate   \true, \false, comparisons, && / ||, ternaries,
//!             \forall / \exists, \at
//! ```
//!
//! Nodes are produced by the annotation converter (outside this crate) or by
//! the builder helpers in [`crate::contract`].

pub mod declaration;
pub mod label;
pub mod operator;
pub mod predicate;
pub mod term;

pub use declaration::{Binder, Declaration, Quantifier};
pub use label::{Builtin, ClauseKind, Label};
pub use operator::{BinaryOperator, UnaryOperator};
pub use predicate::{
    LogicalOperator, LogicalPredicate, Predicate, PredicateVisitor, SimplePredicate,
};
pub use term::{BinaryTerm, BoundIdentifier, Identifier, Term, TermVisitor};

#![allow(missing_docs)]
//! # ACSL - Logic Expressions for C Annotations
//!
//! The logic-expression layer of an ACSL (ANSI/ISO C Specification Language)
//! front end: the term and predicate trees annotations are made of, and the
//! transforms a verifier or runtime-check instrumenter needs on them.
//!
//! ## Features
//!
//! - **Immutable shared trees** - `Arc` nodes, negation as a polarity flag
//! - **Boolean simplifier** - constants, complements, De Morgan, quantifier duals
//! - **Binder substitution** - `\forall` / `\exists` capture of free identifiers
//! - **Well-formedness** - `\result` / `\old` / `\at` placement, identifier resolution
//! - **Contracts** - behaviors, completeness, pre- and post-state obligations
//! - **Translation** - memoized lowering of predicates to C boolean trees
//!
//! ## Quick Start
//!
//! ```rust
//! use acsl::ast::{BinaryOperator, Predicate, Term};
//! use acsl::simplify::{negate, simplify};
//! use acsl::types::{CType, Type};
//!
//! # fn main() -> acsl::Result<()> {
//! let x = Term::identifier("x", Some("f"), Type::C(CType::int()));
//! let p = Predicate::simple(Term::binary(x, Term::int(10), BinaryOperator::Eq)?)?;
//!
//! let q = simplify(&negate(&p));
//! assert_eq!(q.to_string(), "x != 10");
//! assert!(!q.is_negated());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ast ──► simplify ──► contract ──► translate
//!  │         ▲                         ▲
//!  ├──► bind │                         │
//!  └──► wellformed ◄── scope ──────────┘
//! ```
//!
//! ### Main Components
//!
//! - [`ast`] - Terms, predicates, operators, labels, binders
//! - [`types`] - C and logic types, most-general-type promotion
//! - [`simplify`] - Boolean simplification in lazily negated normal form
//! - [`bind`] - Binder substitution
//! - [`wellformed`] - Builtin collection, placement checks, identifier resolution
//! - [`contract`] - Behaviors, completeness clauses, contracts, annotations
//! - [`translate`] - C expressions and expression trees
//! - [`scope`] - Declaration lookup collaborator
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`Result`]. Errors are classified as
//! fatal (a bug in whoever built the tree) or recoverable (a problem with the
//! annotated program):
//!
//! ```rust
//! use acsl::ast::{BinaryOperator, Term};
//! use acsl::error::ErrorSeverity;
//!
//! let err = Term::binary(Term::int(1), Term::int(2), BinaryOperator::And).unwrap_err();
//! assert_eq!(err.classify(), ErrorSeverity::Fatal);
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events at `debug` and `trace` level and never
//! installs a subscriber.

#![allow(clippy::only_used_in_recursion)] // Recursive tree walkers

/// Version of the ACSL logic layer
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ast;
pub mod bind;
pub mod contract;
pub mod error;
pub mod scope;
pub mod simplify;
pub mod translate;
pub mod types;
pub mod wellformed;

// Re-export main types
pub use ast::{BinaryOperator, Label, Predicate, Term};
pub use contract::{Annotation, Behavior, BehaviorBuilder, Contract, ContractBuilder};
pub use error::{Error, ErrorSeverity, Result};
pub use scope::{MapScope, Scope};
pub use simplify::{negate, simplify};
pub use translate::{translate_predicate, ExpressionTree, TranslationOptions};
pub use types::{CType, Type};

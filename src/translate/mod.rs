//! # Translation to Host Expressions
//!
//! Turns annotation predicates into boolean trees over C expressions that a
//! code instrumenter can emit as runtime checks.
//!
//! ## Pipeline
//!
//! ```text
//! Predicate --prepare--> simplified Predicate
//!           --snapshot_old_values--> pre-state temporaries
//!           --PredicateToExpressionTreeVisitor--> ExpressionTree<CExpression>
//! ```
//!
//! Identifiers are resolved through a [`Scope`]. Pre-state values (`\old`)
//! must be snapshotted before the predicate that reads them is translated;
//! the instrumenter emits `temporary = initializer;` at function entry.
//!
//! ## Example
//!
//! ```rust
//! use acsl::ast::{BinaryOperator, Declaration, Predicate, Term};
//! use acsl::scope::MapScope;
//! use acsl::translate::{translate_predicate, TranslationOptions};
//! use acsl::types::{CType, Type};
//!
//! # fn main() -> acsl::Result<()> {
//! let mut scope = MapScope::new();
//! scope.declare(Declaration::Variable {
//!     name: "x".to_string(),
//!     ty: CType::int(),
//!     function_name: Some("f".to_string()),
//! });
//!
//! let x = Term::identifier("x", Some("f"), Type::C(CType::int()));
//! let p = Predicate::simple(Term::binary(x, Term::int(10), BinaryOperator::Eq)?)?.negated();
//!
//! let translation = translate_predicate(&p, &scope, TranslationOptions::default())?;
//! assert_eq!(translation.tree.to_string(), "x != 10");
//! # Ok(())
//! # }
//! ```

pub mod c_expression;
pub mod options;
pub mod predicate_visitor;
pub mod term_visitor;
pub mod tree;

pub use c_expression::{CBinaryOperator, CExpression, CUnaryOperator};
pub use options::TranslationOptions;
pub use predicate_visitor::PredicateToExpressionTreeVisitor;
pub use term_visitor::{OldValue, TermToCExpressionVisitor};
pub use tree::ExpressionTree;

use std::sync::Arc;

use crate::ast::Predicate;
use crate::error::Result;
use crate::scope::Scope;
use crate::simplify::simplify;

/// A translated predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Pre-state temporaries to materialize before the check
    pub old_values: Vec<OldValue>,
    /// The check itself
    pub tree: ExpressionTree<CExpression>,
}

/// The predicate that will actually be translated under `options`
pub fn prepare(predicate: &Arc<Predicate>, options: &TranslationOptions) -> Arc<Predicate> {
    if options.simplify_before_translation {
        simplify(predicate)
    } else {
        Arc::clone(predicate)
    }
}

/// Prepare, snapshot and translate `predicate` in one go
pub fn translate_predicate<S: Scope>(
    predicate: &Arc<Predicate>,
    scope: S,
    options: TranslationOptions,
) -> Result<Translation> {
    let prepared = prepare(predicate, &options);
    let mut terms = TermToCExpressionVisitor::new(scope, options);
    let old_values = terms.snapshot_old_values(&prepared)?;
    let mut visitor = PredicateToExpressionTreeVisitor::new(terms);
    let tree = visitor.translate(&prepared)?;
    tracing::debug!(
        "translated {} into {} ({} pre-state values)",
        prepared,
        tree,
        old_values.len()
    );
    Ok(Translation { old_values, tree })
}

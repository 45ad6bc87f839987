//! Predicate translation into expression trees

use super::c_expression::{CBinaryOperator, CExpression};
use super::term_visitor::TermToCExpressionVisitor;
use super::tree::ExpressionTree;
use crate::ast::{Label, LogicalOperator, Predicate, PredicateVisitor, SimplePredicate, TermVisitor};
use crate::error::{Error, Result};
use crate::scope::Scope;

/// Translates predicates into [`ExpressionTree`]s of C conditions
///
/// Comparisons become leaves tagged with their polarity; negated
/// connectives are pushed to the leaves. Terms go through the wrapped
/// [`TermToCExpressionVisitor`] and share its cache.
pub struct PredicateToExpressionTreeVisitor<'a, S: Scope> {
    terms: TermToCExpressionVisitor<'a, S>,
}

impl<'a, S: Scope> PredicateToExpressionTreeVisitor<'a, S> {
    /// Wrap a term visitor
    pub fn new(terms: TermToCExpressionVisitor<'a, S>) -> Self {
        PredicateToExpressionTreeVisitor { terms }
    }

    /// Term visitor used for leaves
    pub fn terms(&mut self) -> &mut TermToCExpressionVisitor<'a, S> {
        &mut self.terms
    }

    /// Give back the term visitor
    pub fn into_terms(self) -> TermToCExpressionVisitor<'a, S> {
        self.terms
    }

    /// Translate `predicate`
    pub fn translate(&mut self, predicate: &'a Predicate) -> Result<ExpressionTree<CExpression>> {
        self.visit_predicate(predicate)
    }

    fn tree(&mut self, predicate: &'a Predicate, in_old: bool) -> Result<ExpressionTree<CExpression>> {
        match predicate {
            Predicate::True => Ok(ExpressionTree::True),
            Predicate::False => Ok(ExpressionTree::False),
            Predicate::Simple(simple) => {
                let expression = self.comparison(simple, in_old)?;
                Ok(ExpressionTree::leaf(expression, !simple.is_negated()))
            }
            Predicate::Logical(logical) => {
                let left = self.tree(&logical.left, in_old)?;
                let right = self.tree(&logical.right, in_old)?;
                Ok(match (logical.op, logical.negated) {
                    (LogicalOperator::And, false) => ExpressionTree::and([left, right]),
                    (LogicalOperator::Or, false) => ExpressionTree::or([left, right]),
                    (LogicalOperator::And, true) => {
                        ExpressionTree::or([left.negate(), right.negate()])
                    }
                    (LogicalOperator::Or, true) => {
                        ExpressionTree::and([left.negate(), right.negate()])
                    }
                })
            }
            Predicate::Ternary {
                condition,
                then,
                otherwise,
                negated,
            } => {
                let c = self.tree(condition, in_old)?;
                let t = self.tree(then, in_old)?;
                let e = self.tree(otherwise, in_old)?;
                // (c && t) || (!c && e)
                let tree = ExpressionTree::or([
                    ExpressionTree::and([c.clone(), t]),
                    ExpressionTree::and([c.negate(), e]),
                ]);
                Ok(if *negated { tree.negate() } else { tree })
            }
            Predicate::Quantified { .. } => {
                tracing::debug!("no host translation for {}", predicate);
                Err(Error::unsupported(format!("quantified predicate {}", predicate)))
            }
            Predicate::At {
                inner,
                label: Label::Old,
                negated,
            } => {
                let tree = self.tree(inner, true)?;
                Ok(if *negated { tree.negate() } else { tree })
            }
            Predicate::At { inner, label, .. } => {
                tracing::debug!("no host translation for \\at({}, {})", inner, label);
                Err(Error::unsupported(format!("\\at({}, {})", inner, label)))
            }
        }
    }

    /// The comparison itself, without its polarity
    fn comparison(&mut self, simple: &'a SimplePredicate, in_old: bool) -> Result<CExpression> {
        if !in_old {
            return self.terms.visit_term(simple.term());
        }
        let comparison = simple.term().as_comparison().ok_or_else(|| Error::NotAComparison {
            term: simple.term().to_string(),
        })?;
        Ok(CExpression::binary(
            CBinaryOperator::from_logic(comparison.operator())?,
            self.terms.old_value(comparison.left())?,
            self.terms.old_value(comparison.right())?,
        ))
    }
}

impl<'a, S: Scope> PredicateVisitor<'a> for PredicateToExpressionTreeVisitor<'a, S> {
    type Output = ExpressionTree<CExpression>;

    fn visit_predicate(&mut self, predicate: &'a Predicate) -> Result<Self::Output> {
        self.tree(predicate, false)
    }
}

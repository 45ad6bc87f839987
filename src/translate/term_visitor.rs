//! Term translation into C expressions

use serde::Serialize;
use std::collections::HashMap;
use std::marker::PhantomData;

use super::c_expression::{CBinaryOperator, CExpression};
use super::options::TranslationOptions;
use crate::ast::{Label, Predicate, Term, TermVisitor};
use crate::error::{Error, Result};
use crate::scope::Scope;

/// Pre-state temporary introduced by [`TermToCExpressionVisitor::snapshot_old_values`]
///
/// The caller materializes `temporary = initializer;` at the pre-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OldValue {
    /// Fresh variable holding the value
    pub temporary: CExpression,
    /// Expression evaluated in the pre-state
    pub initializer: CExpression,
}

/// Translates terms into [`CExpression`]s
///
/// Results are cached by the address of the borrowed node, so a subtree
/// shared between several parents is translated and looked up in the scope
/// only once. The cache lives as long as the visitor.
///
/// `\at(t, Old)` is translated to the old value registered for the node `t`;
/// see [`register_old_value`](Self::register_old_value) and
/// [`snapshot_old_values`](Self::snapshot_old_values).
pub struct TermToCExpressionVisitor<'a, S: Scope> {
    scope: S,
    options: TranslationOptions,
    cache: HashMap<*const Term, CExpression>,
    old_values: HashMap<*const Term, CExpression>,
    temporaries: usize,
    _tree: PhantomData<&'a Term>,
}

impl<'a, S: Scope> TermToCExpressionVisitor<'a, S> {
    /// Create a visitor resolving identifiers in `scope`
    pub fn new(scope: S, options: TranslationOptions) -> Self {
        TermToCExpressionVisitor {
            scope,
            options,
            cache: HashMap::new(),
            old_values: HashMap::new(),
            temporaries: 0,
            _tree: PhantomData,
        }
    }

    /// Options in use
    pub fn options(&self) -> &TranslationOptions {
        &self.options
    }

    /// Scope identifiers are resolved in
    pub fn scope(&self) -> &S {
        &self.scope
    }

    /// Number of translated nodes held in the cache
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Translate `term` in the current state
    pub fn translate(&mut self, term: &'a Term) -> Result<CExpression> {
        self.visit_term(term)
    }

    /// Record the pre-state value of the node `term`
    pub fn register_old_value(&mut self, term: &'a Term, value: CExpression) {
        self.old_values.insert(term as *const Term, value);
    }

    /// Pre-state value recorded for the node `term`
    pub fn old_value(&self, term: &Term) -> Result<CExpression> {
        self.old_values
            .get(&(term as *const Term))
            .cloned()
            .ok_or_else(|| Error::MissingOldValue {
                term: term.to_string(),
            })
    }

    /// Whether a pre-state value is recorded for the node `term`
    pub fn has_old_value(&self, term: &Term) -> bool {
        self.old_values.contains_key(&(term as *const Term))
    }

    /// Introduce a temporary for every pre-state value `predicate` reads
    ///
    /// Covers the inner term of every `\old(t)` and both operands of every
    /// comparison under an `\at(p, Old)` predicate. Each is translated in the
    /// current state and registered as its node's old value. Nodes that
    /// already have an old value are skipped; literals are registered as
    /// themselves.
    pub fn snapshot_old_values(&mut self, predicate: &'a Predicate) -> Result<Vec<OldValue>> {
        let mut targets = Vec::new();
        let mut operands = Vec::new();
        collect_predicate(predicate, false, &mut targets, &mut operands);
        targets.extend(operands);

        let mut snapshots = Vec::new();
        for term in targets {
            if self.has_old_value(term) {
                continue;
            }
            let initializer = self.translate(term)?;
            if is_literal(term) {
                self.register_old_value(term, initializer);
                continue;
            }
            let ty = term
                .expression_type()
                .to_c_type()
                .ok_or_else(|| Error::unsupported(format!("pre-state value of {}", term)))?;
            let temporary = CExpression::variable(self.options.old_value_name(self.temporaries), ty);
            self.temporaries += 1;
            tracing::debug!("snapshot {} as {} = {}", term, temporary, initializer);
            self.register_old_value(term, temporary.clone());
            snapshots.push(OldValue {
                temporary,
                initializer,
            });
        }
        Ok(snapshots)
    }

    fn translate_uncached(&mut self, term: &'a Term) -> Result<CExpression> {
        match term {
            Term::IntegerLiteral(n) => Ok(CExpression::Integer(*n)),
            Term::RealLiteral(text) => Ok(CExpression::Float(text.clone())),
            Term::CharLiteral(c) => Ok(CExpression::Char(*c)),
            Term::StringLiteral(s) => Ok(CExpression::Str(s.clone())),
            Term::BooleanLiteral(b) => Ok(CExpression::Bool(*b)),
            Term::Identifier(id) => self
                .scope
                .lookup_variable(&id.name)
                .map(CExpression::Id)
                .ok_or_else(|| Error::unrecognized(&id.name, "undeclared variable")),
            Term::BoundIdentifier(id) => {
                tracing::debug!("bound identifier {} has no host translation", id.name);
                Err(Error::unsupported(format!(
                    "{} bound by {}",
                    id.name, id.quantifier
                )))
            }
            Term::Result { ty } => {
                let ty = ty
                    .to_c_type()
                    .ok_or_else(|| Error::unsupported(format!("\\result of type {}", ty)))?;
                Ok(CExpression::variable(self.options.result_variable.clone(), ty))
            }
            Term::ArrayAccess { array, index } => Ok(CExpression::Subscript {
                array: Box::new(self.visit_term(array)?),
                index: Box::new(self.visit_term(index)?),
            }),
            Term::Binary(binary) => {
                let op = CBinaryOperator::from_logic(binary.operator())?;
                let left = self.visit_term(binary.left())?;
                let right = self.visit_term(binary.right())?;
                Ok(CExpression::binary(op, left, right))
            }
            Term::Unary { op, operand } => {
                Ok(CExpression::unary((*op).into(), self.visit_term(operand)?))
            }
            Term::Cast { ty, term: inner } => {
                let ty = ty
                    .to_c_type()
                    .ok_or_else(|| Error::unsupported(format!("cast to {}", ty)))?;
                Ok(CExpression::Cast {
                    ty,
                    expression: Box::new(self.visit_term(inner)?),
                })
            }
            Term::At {
                inner,
                label: Label::Old,
            } => self.old_value(inner),
            Term::At { inner, label } => {
                tracing::debug!("no host translation for \\at({}, {})", inner, label);
                Err(Error::unsupported(format!("\\at({}, {})", inner, label)))
            }
            Term::FunctionCall { name, args, .. } => {
                let function = self
                    .scope
                    .lookup_function(name)
                    .ok_or_else(|| Error::unrecognized(name, "undeclared function"))?;
                let args = args
                    .iter()
                    .map(|arg| self.visit_term(arg))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CExpression::Call { function, args })
            }
        }
    }
}

impl<'a, S: Scope> TermVisitor<'a> for TermToCExpressionVisitor<'a, S> {
    type Output = CExpression;

    fn visit_term(&mut self, term: &'a Term) -> Result<CExpression> {
        let key = term as *const Term;
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!("cache hit for {}", term);
            return Ok(hit.clone());
        }
        let expression = self.translate_uncached(term)?;
        self.cache.insert(key, expression.clone());
        Ok(expression)
    }
}

fn is_literal(term: &Term) -> bool {
    matches!(
        term,
        Term::IntegerLiteral(_)
            | Term::RealLiteral(_)
            | Term::CharLiteral(_)
            | Term::StringLiteral(_)
            | Term::BooleanLiteral(_)
    )
}

/// Inner terms of `\old` nodes, innermost first
fn collect_term<'a>(term: &'a Term, targets: &mut Vec<&'a Term>) {
    for child in term.children() {
        collect_term(child, targets);
    }
    if let Term::At {
        inner,
        label: Label::Old,
    } = term
    {
        targets.push(inner);
    }
}

fn collect_predicate<'a>(
    predicate: &'a Predicate,
    in_old: bool,
    targets: &mut Vec<&'a Term>,
    operands: &mut Vec<&'a Term>,
) {
    match predicate {
        Predicate::True | Predicate::False => {}
        Predicate::Simple(simple) => {
            collect_term(simple.term(), targets);
            if in_old {
                if let Some(comparison) = simple.term().as_comparison() {
                    operands.push(comparison.left());
                    operands.push(comparison.right());
                }
            }
        }
        Predicate::Logical(logical) => {
            collect_predicate(&logical.left, in_old, targets, operands);
            collect_predicate(&logical.right, in_old, targets, operands);
        }
        Predicate::Ternary {
            condition,
            then,
            otherwise,
            ..
        } => {
            collect_predicate(condition, in_old, targets, operands);
            collect_predicate(then, in_old, targets, operands);
            collect_predicate(otherwise, in_old, targets, operands);
        }
        Predicate::Quantified { body, .. } => collect_predicate(body, in_old, targets, operands),
        Predicate::At { inner, label, .. } => {
            let in_old = in_old || *label == Label::Old;
            collect_predicate(inner, in_old, targets, operands);
        }
    }
}

//! Boolean trees over host expressions

use serde::Serialize;
use std::fmt;

use super::c_expression::{CBinaryOperator, CExpression};

/// Boolean combination of leaf expressions
///
/// `Leaf { assume_truth: false }` stands for the negation of the leaf.
/// The `and`/`or` constructors flatten nested nodes of the same kind and
/// fold constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ExpressionTree<L> {
    True,
    False,
    Leaf { expression: L, assume_truth: bool },
    And(Vec<ExpressionTree<L>>),
    Or(Vec<ExpressionTree<L>>),
}

impl<L> ExpressionTree<L> {
    /// Constant tree
    pub fn constant(value: bool) -> Self {
        if value {
            ExpressionTree::True
        } else {
            ExpressionTree::False
        }
    }

    /// Leaf asserting `expression` (or its negation)
    pub fn leaf(expression: L, assume_truth: bool) -> Self {
        ExpressionTree::Leaf {
            expression,
            assume_truth,
        }
    }

    /// Flattened conjunction
    pub fn and(children: impl IntoIterator<Item = ExpressionTree<L>>) -> Self {
        let mut flat = Vec::new();
        for child in children {
            match child {
                ExpressionTree::True => {}
                ExpressionTree::False => return ExpressionTree::False,
                ExpressionTree::And(grandchildren) => flat.extend(grandchildren),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => ExpressionTree::True,
            1 => flat.pop().unwrap_or(ExpressionTree::True),
            _ => ExpressionTree::And(flat),
        }
    }

    /// Flattened disjunction
    pub fn or(children: impl IntoIterator<Item = ExpressionTree<L>>) -> Self {
        let mut flat = Vec::new();
        for child in children {
            match child {
                ExpressionTree::False => {}
                ExpressionTree::True => return ExpressionTree::True,
                ExpressionTree::Or(grandchildren) => flat.extend(grandchildren),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => ExpressionTree::False,
            1 => flat.pop().unwrap_or(ExpressionTree::False),
            _ => ExpressionTree::Or(flat),
        }
    }

    /// Logical complement, pushed down to the leaves
    pub fn negate(self) -> Self {
        match self {
            ExpressionTree::True => ExpressionTree::False,
            ExpressionTree::False => ExpressionTree::True,
            ExpressionTree::Leaf {
                expression,
                assume_truth,
            } => ExpressionTree::leaf(expression, !assume_truth),
            ExpressionTree::And(children) => {
                ExpressionTree::or(children.into_iter().map(ExpressionTree::negate))
            }
            ExpressionTree::Or(children) => {
                ExpressionTree::and(children.into_iter().map(ExpressionTree::negate))
            }
        }
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        match self {
            ExpressionTree::True | ExpressionTree::False => 0,
            ExpressionTree::Leaf { .. } => 1,
            ExpressionTree::And(children) | ExpressionTree::Or(children) => {
                children.iter().map(ExpressionTree::leaf_count).sum()
            }
        }
    }
}

impl ExpressionTree<CExpression> {
    /// Collapse the tree into one C condition
    pub fn to_expression(&self) -> CExpression {
        match self {
            ExpressionTree::True => CExpression::Bool(true),
            ExpressionTree::False => CExpression::Bool(false),
            ExpressionTree::Leaf {
                expression,
                assume_truth: true,
            } => expression.clone(),
            ExpressionTree::Leaf { expression, .. } => CExpression::not(expression.clone()),
            ExpressionTree::And(children) => fold(children, CBinaryOperator::LogicalAnd, true),
            ExpressionTree::Or(children) => fold(children, CBinaryOperator::LogicalOr, false),
        }
    }
}

fn fold(children: &[ExpressionTree<CExpression>], op: CBinaryOperator, empty: bool) -> CExpression {
    let mut exprs = children.iter().map(ExpressionTree::to_expression);
    let Some(first) = exprs.next() else {
        return CExpression::Bool(empty);
    };
    exprs.fold(first, |acc, e| CExpression::binary(op, acc, e))
}

impl<L: fmt::Display> fmt::Display for ExpressionTree<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, children: &[ExpressionTree<L>], sep: &str| {
            write!(f, "(")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", sep)?;
                }
                write!(f, "{}", child)?;
            }
            write!(f, ")")
        };
        match self {
            ExpressionTree::True => write!(f, "true"),
            ExpressionTree::False => write!(f, "false"),
            ExpressionTree::Leaf {
                expression,
                assume_truth: true,
            } => write!(f, "{}", expression),
            ExpressionTree::Leaf { expression, .. } => write!(f, "!({})", expression),
            ExpressionTree::And(children) => join(f, children, "&&"),
            ExpressionTree::Or(children) => join(f, children, "||"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> ExpressionTree<String> {
        ExpressionTree::leaf(name.to_string(), true)
    }

    #[test]
    fn test_constructors_flatten_and_fold() {
        let inner = ExpressionTree::and([leaf("a"), leaf("b")]);
        let outer = ExpressionTree::and([inner, ExpressionTree::True, leaf("c")]);
        assert_eq!(outer, ExpressionTree::And(vec![leaf("a"), leaf("b"), leaf("c")]));

        assert_eq!(ExpressionTree::or([leaf("a"), ExpressionTree::True]), ExpressionTree::True);
        assert_eq!(ExpressionTree::and([leaf("a"), ExpressionTree::False]), ExpressionTree::False);
        assert_eq!(ExpressionTree::or([ExpressionTree::False, leaf("a")]), leaf("a"));
        assert_eq!(ExpressionTree::<String>::and([]), ExpressionTree::True);
    }

    #[test]
    fn test_negate_pushes_to_leaves() {
        let tree = ExpressionTree::or([leaf("a"), ExpressionTree::leaf("b".to_string(), false)]);
        assert_eq!(
            tree.negate(),
            ExpressionTree::And(vec![
                ExpressionTree::leaf("a".to_string(), false),
                leaf("b")
            ])
        );
    }

    #[test]
    fn test_display() {
        let tree = ExpressionTree::or([
            ExpressionTree::and([leaf("a"), ExpressionTree::leaf("b".to_string(), false)]),
            leaf("c"),
        ]);
        assert_eq!(tree.to_string(), "((a && !(b)) || c)");
        assert_eq!(tree.leaf_count(), 3);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Program points a term or predicate can be evaluated at
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    /// Pre-state of the enclosing function or statement contract
    Old,
    /// Pre-state of the enclosing function
    Pre,
    /// Post-state of the enclosing function
    Post,
    /// The current program point
    Here,
    /// State before the first iteration of the enclosing loop
    LoopEntry,
    /// State at the start of the current loop iteration
    LoopCurrent,
    /// A C label in the function body
    Program(String),
}

impl Label {
    /// Parse a label as written in `\at(e, L)`
    pub fn from_name(name: &str) -> Self {
        match name {
            "Old" => Label::Old,
            "Pre" => Label::Pre,
            "Post" => Label::Post,
            "Here" => Label::Here,
            "LoopEntry" => Label::LoopEntry,
            "LoopCurrent" => Label::LoopCurrent,
            other => Label::Program(other.to_string()),
        }
    }

    /// Labels that denote the pre-state
    pub fn is_pre_state(&self) -> bool {
        matches!(self, Label::Old | Label::Pre)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Old => write!(f, "Old"),
            Label::Pre => write!(f, "Pre"),
            Label::Post => write!(f, "Post"),
            Label::Here => write!(f, "Here"),
            Label::LoopEntry => write!(f, "LoopEntry"),
            Label::LoopCurrent => write!(f, "LoopCurrent"),
            Label::Program(name) => write!(f, "{}", name),
        }
    }
}

/// Clause positions an annotation predicate can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClauseKind {
    /// `requires` clause
    Requires,
    /// `ensures` clause
    Ensures,
    /// `assumes` clause of a behavior
    Assumes,
    /// `assert` annotation
    Assertion,
    /// `loop invariant` annotation
    LoopInvariant,
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseKind::Requires => write!(f, "requires"),
            ClauseKind::Ensures => write!(f, "ensures"),
            ClauseKind::Assumes => write!(f, "assumes"),
            ClauseKind::Assertion => write!(f, "assert"),
            ClauseKind::LoopInvariant => write!(f, "loop invariant"),
        }
    }
}

/// Builtin markers with clause-placement restrictions
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Builtin {
    /// `\result`
    Result,
    /// `\old(e)`, i.e. `\at(e, Old)`
    Old,
    /// `\at(e, L)` for any label other than `Old`
    At(Label),
}

impl Builtin {
    /// Placement rule for this builtin
    pub fn is_allowed_in(&self, clause: ClauseKind) -> bool {
        match self {
            Builtin::Result => clause == ClauseKind::Ensures,
            Builtin::Old => !matches!(clause, ClauseKind::Requires | ClauseKind::Assumes),
            Builtin::At(Label::Pre) | Builtin::At(Label::Here) => true,
            Builtin::At(Label::Post) => clause == ClauseKind::Ensures,
            Builtin::At(Label::LoopEntry) | Builtin::At(Label::LoopCurrent) => {
                clause == ClauseKind::LoopInvariant
            }
            Builtin::At(Label::Program(_)) => {
                matches!(clause, ClauseKind::Assertion | ClauseKind::LoopInvariant)
            }
            Builtin::At(Label::Old) => Builtin::Old.is_allowed_in(clause),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Builtin::Result => write!(f, "\\result"),
            Builtin::Old => write!(f, "\\old"),
            Builtin::At(label) => write!(f, "\\at(_, {})", label),
        }
    }
}

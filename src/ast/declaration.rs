use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::types::{CType, Type};

/// Quantifier kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    /// `\forall`
    ForAll,
    /// `\exists`
    Exists,
}

impl Quantifier {
    /// `\forall` <-> `\exists`
    pub fn dual(self) -> Self {
        match self {
            Quantifier::ForAll => Quantifier::Exists,
            Quantifier::Exists => Quantifier::ForAll,
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::ForAll => write!(f, "\\forall"),
            Quantifier::Exists => write!(f, "\\exists"),
        }
    }
}

/// Variables declared by one quantifier, all of the same type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binder {
    /// Type of the bound variables
    pub ty: Type,
    /// Bound variable names
    pub names: BTreeSet<String>,
}

impl Binder {
    /// Binder over `names`, all of type `ty`
    pub fn new<I, S>(ty: Type, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Binder {
            ty,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this binder declares `name`
    pub fn binds(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl fmt::Display for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        write!(f, "{} {}", self.ty, names.join(", "))
    }
}

/// Declarations returned by scope lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Declaration {
    /// Program variable
    Variable {
        /// Variable name
        name: String,
        /// Declared C type
        ty: CType,
        /// Enclosing function, None for globals
        function_name: Option<String>,
    },
    /// C function
    Function {
        /// Function name
        name: String,
        /// Return type
        return_type: CType,
        /// Parameter types
        params: Vec<CType>,
    },
}

impl Declaration {
    /// Declared name
    pub fn name(&self) -> &str {
        match self {
            Declaration::Variable { name, .. } | Declaration::Function { name, .. } => name,
        }
    }

    /// Type of the declared entity (the return type for functions)
    pub fn ty(&self) -> &CType {
        match self {
            Declaration::Variable { ty, .. } => ty,
            Declaration::Function { return_type, .. } => return_type,
        }
    }
}

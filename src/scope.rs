//! Scope collaborator used to resolve annotation identifiers.
//!
//! The symbol table itself lives outside this crate; translation and
//! well-formedness checks only need the two lookups of [`Scope`].
//! [`MapScope`] is a small in-memory implementation with nested blocks.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::Declaration;

/// Declarations visible at an annotation
pub trait Scope {
    /// Look up a program variable
    fn lookup_variable(&self, name: &str) -> Option<Declaration>;

    /// Look up a function
    fn lookup_function(&self, name: &str) -> Option<Declaration>;
}

impl<S: Scope + ?Sized> Scope for &S {
    fn lookup_variable(&self, name: &str) -> Option<Declaration> {
        (**self).lookup_variable(name)
    }

    fn lookup_function(&self, name: &str) -> Option<Declaration> {
        (**self).lookup_function(name)
    }
}

/// Scope backed by hash maps
#[derive(Debug, Clone)]
pub struct MapScope {
    /// Stack of nested blocks, innermost last
    blocks: Vec<HashMap<String, Declaration>>,
    /// Functions, shared between clones
    functions: Arc<HashMap<String, Declaration>>,
}

impl MapScope {
    /// Creates a scope with an empty global block
    pub fn new() -> Self {
        MapScope {
            blocks: vec![HashMap::new()],
            functions: Arc::new(HashMap::new()),
        }
    }

    /// Creates a scope with a fixed set of function declarations
    pub fn with_functions(functions: impl IntoIterator<Item = Declaration>) -> Self {
        MapScope {
            blocks: vec![HashMap::new()],
            functions: Arc::new(
                functions
                    .into_iter()
                    .map(|d| (d.name().to_string(), d))
                    .collect(),
            ),
        }
    }

    /// Enters a nested block
    pub fn enter_block(&mut self) {
        self.blocks.push(HashMap::new());
    }

    /// Leaves the innermost block; the global block is never left
    pub fn exit_block(&mut self) {
        if self.blocks.len() > 1 {
            self.blocks.pop();
        }
    }

    /// Declares a variable in the innermost block
    pub fn declare(&mut self, declaration: Declaration) {
        if let Some(block) = self.blocks.last_mut() {
            block.insert(declaration.name().to_string(), declaration);
        }
    }
}

impl Default for MapScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope for MapScope {
    fn lookup_variable(&self, name: &str) -> Option<Declaration> {
        self.blocks
            .iter()
            .rev()
            .find_map(|block| block.get(name))
            .cloned()
    }

    fn lookup_function(&self, name: &str) -> Option<Declaration> {
        self.functions.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CType;

    fn variable(name: &str, ty: CType) -> Declaration {
        Declaration::Variable {
            name: name.to_string(),
            ty,
            function_name: None,
        }
    }

    #[test]
    fn test_inner_block_shadows_outer() {
        let mut scope = MapScope::new();
        scope.declare(variable("x", CType::int()));
        scope.enter_block();
        scope.declare(variable("x", CType::Double));
        assert_eq!(scope.lookup_variable("x").unwrap().ty(), &CType::Double);
        scope.exit_block();
        assert_eq!(scope.lookup_variable("x").unwrap().ty(), &CType::int());
        scope.exit_block();
        assert!(scope.lookup_variable("x").is_some());
    }

    #[test]
    fn test_functions() {
        let scope = MapScope::with_functions([Declaration::Function {
            name: "abs".to_string(),
            return_type: CType::int(),
            params: vec![CType::int()],
        }]);
        assert!(scope.lookup_function("abs").is_some());
        assert!(scope.lookup_variable("abs").is_none());
    }
}

//! Modules: named registries of runtime types.
//!
//! A [`Module`] plays the role of a loaded assembly. It owns the types defined in it and
//! resolves them by their qualified name. Storage mirrors a metadata type registry: a
//! token-ordered `SkipMap` as the primary store, with a `DashMap` name index on top, so that
//! lookups and insertions never block each other.
//!
//! # Examples
//!
//! ```rust
//! use dotreflect::runtime::{ClassBuilder, Module};
//!
//! let module = Module::new("Tests");
//! ClassBuilder::new("Tests.Widget").build(&module)?;
//!
//! assert!(module.get_type("Tests.Widget").is_some());
//! assert!(module.get_type("Tests.Gadget").is_none());
//! # Ok::<(), dotreflect::Error>(())
//! ```

use std::sync::Arc;

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};

use crate::{
    runtime::{Token, TypeRc},
    Error::TypeInsert,
    Result,
};

/// Reference to a [`Module`]
pub type ModuleRc = Arc<Module>;

/// A named collection of runtime types
pub struct Module {
    /// Module name
    pub name: String,
    types: SkipMap<Token, TypeRc>,
    types_by_fullname: DashMap<String, Token>,
}

impl Module {
    /// Create a new, empty module
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            types: SkipMap::new(),
            types_by_fullname: DashMap::new(),
        }
    }

    /// Register a type.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if a type with the same full name already exists.
    pub fn insert(&self, new_type: &TypeRc) -> Result<()> {
        let fullname = new_type.fullname();
        match self.types_by_fullname.entry(fullname) {
            Entry::Occupied(entry) => Err(TypeInsert(entry.key().clone())),
            Entry::Vacant(entry) => {
                self.types.insert(new_type.token, new_type.clone());
                entry.insert(new_type.token);
                Ok(())
            }
        }
    }

    /// Look up a type by its qualified name (`Namespace.Name`)
    #[must_use]
    pub fn get_type(&self, fullname: &str) -> Option<TypeRc> {
        let token = *self.types_by_fullname.get(fullname)?;
        self.get(&token)
    }

    /// Look up a type by token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<TypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// All types in a namespace
    #[must_use]
    pub fn get_by_namespace(&self, namespace: &str) -> Vec<TypeRc> {
        self.types
            .iter()
            .filter(|entry| entry.value().namespace == namespace)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// All types, in definition order
    #[must_use]
    pub fn all_types(&self) -> Vec<TypeRc> {
        self.types
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns the total number of types in the module
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the module defines no types
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("types", &self.types.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeType;

    fn make_type(namespace: &str, name: &str) -> TypeRc {
        let ty = RuntimeType::new(
            namespace.to_string(),
            name.to_string(),
            "Tests".to_string(),
            None,
        );
        Arc::new(ty.unwrap())
    }

    #[test]
    fn test_insert_and_lookup() {
        let module = Module::new("Tests");
        let ty = make_type("Tests.Model", "Person");
        module.insert(&ty).unwrap();

        let found = module.get_type("Tests.Model.Person").unwrap();
        assert!(Arc::ptr_eq(&found, &ty));
        assert_eq!(module.get(&ty.token).unwrap().name, "Person");
        assert_eq!(module.len(), 1);
    }

    #[test]
    fn test_lookup_without_namespace() {
        let module = Module::new("Tests");
        module.insert(&make_type("", "Globals")).unwrap();
        assert!(module.get_type("Globals").is_some());
        assert!(module.get_type(".Globals").is_none());
    }

    #[test]
    fn test_duplicate_insert() {
        let module = Module::new("Tests");
        module.insert(&make_type("Tests", "Person")).unwrap();
        let err = module.insert(&make_type("Tests", "Person")).unwrap_err();
        assert_eq!(err, TypeInsert("Tests.Person".to_string()));
        assert_eq!(module.len(), 1);
    }

    #[test]
    fn test_by_namespace() {
        let module = Module::new("Tests");
        module.insert(&make_type("A", "One")).unwrap();
        module.insert(&make_type("A", "Two")).unwrap();
        module.insert(&make_type("B", "Three")).unwrap();

        let names: Vec<_> = module
            .get_by_namespace("A")
            .iter()
            .map(|ty| ty.name.clone())
            .collect();
        assert_eq!(names, vec!["One", "Two"]);
        assert_eq!(module.all_types().len(), 3);
        assert!(!module.is_empty());
    }
}

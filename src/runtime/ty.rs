//! Runtime type descriptors and member lookup.

use std::fmt;
use std::sync::Arc;

use crate::{
    runtime::{BindingFlags, ConstructorRc, FieldRc, MethodRc, PropertyRc, Token, TokenKind},
    Result,
};

/// Reference to a [`RuntimeType`]
pub type TypeRc = Arc<RuntimeType>;

/// A type of the runtime type system.
///
/// Member lists are append-only (`boxcar`) so that a type can be shared while its builder is
/// still attaching members; after [`crate::runtime::ClassBuilder::build`] returns they are not
/// touched again.
pub struct RuntimeType {
    /// Token
    pub token: Token,
    /// `TypeNamespace` (can be empty)
    pub namespace: String,
    /// `TypeName`
    pub name: String,
    /// Name of the module that defines this type
    pub module: String,
    base: Option<TypeRc>,
    /// All fields this type declares
    pub fields: boxcar::Vec<FieldRc>,
    /// All methods this type declares, including property accessors
    pub methods: boxcar::Vec<MethodRc>,
    /// All properties this type declares
    pub properties: boxcar::Vec<PropertyRc>,
    /// All instance constructors this type declares
    pub constructors: boxcar::Vec<ConstructorRc>,
}

impl RuntimeType {
    /// Create a new type without any members
    ///
    /// # Errors
    /// Returns [`crate::Error::TokenExhausted`] if no type token is left.
    pub fn new(
        namespace: String,
        name: String,
        module: String,
        base: Option<TypeRc>,
    ) -> Result<Self> {
        Ok(RuntimeType {
            token: Token::next(TokenKind::TypeDef)?,
            namespace,
            name,
            module,
            base,
            fields: boxcar::Vec::new(),
            methods: boxcar::Vec::new(),
            properties: boxcar::Vec::new(),
            constructors: boxcar::Vec::new(),
        })
    }

    /// Returns the full name (Namespace.Name) of the type, or just the name without a namespace
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// Access the base type of this type, if it exists
    #[must_use]
    pub fn base(&self) -> Option<&TypeRc> {
        self.base.as_ref()
    }

    /// Returns `true` if this type is, or derives from, the type with `token`
    #[must_use]
    pub fn inherits(&self, token: Token) -> bool {
        self.hierarchy().any(|ty| ty.token == token)
    }

    /// Returns `true` if a proper base type of this type has the full name `fullname`
    #[must_use]
    pub fn is_subclass_of(&self, fullname: &str) -> bool {
        self.hierarchy().skip(1).any(|ty| ty.fullname() == fullname)
    }

    /// This type followed by all of its base types, most derived first
    pub fn hierarchy(&self) -> impl Iterator<Item = &RuntimeType> {
        std::iter::successors(Some(self), |ty| ty.base.as_deref())
    }

    fn lookup<T>(
        &self,
        filter: BindingFlags,
        mut pick: impl FnMut(&RuntimeType, bool) -> Option<T>,
    ) -> Option<T> {
        for (depth, ty) in self.hierarchy().enumerate() {
            let inherited = depth > 0;
            if inherited && filter.contains(BindingFlags::DECLARED_ONLY) {
                break;
            }
            if let Some(found) = pick(ty, inherited) {
                return Some(found);
            }
        }
        None
    }

    /// Find the first method named `name` that is visible under `filter`
    #[must_use]
    pub fn find_method(&self, name: &str, filter: BindingFlags) -> Option<MethodRc> {
        self.lookup(filter, |ty, inherited| {
            ty.methods
                .iter()
                .map(|(_, method)| method)
                .find(|method| method.name == name && filter.admits(method.flags, inherited))
                .cloned()
        })
    }

    /// Find the first field named `name` that is visible under `filter`
    #[must_use]
    pub fn find_field(&self, name: &str, filter: BindingFlags) -> Option<FieldRc> {
        self.lookup(filter, |ty, inherited| {
            ty.fields
                .iter()
                .map(|(_, field)| field)
                .find(|field| field.name == name && filter.admits(field.flags, inherited))
                .cloned()
        })
    }

    /// Find the first property named `name` with at least one accessor visible under `filter`
    #[must_use]
    pub fn find_property(&self, name: &str, filter: BindingFlags) -> Option<PropertyRc> {
        self.lookup(filter, |ty, inherited| {
            ty.properties
                .iter()
                .map(|(_, property)| property)
                .find(|property| {
                    property.name == name
                        && property
                            .accessors()
                            .any(|accessor| filter.admits(accessor.flags, inherited))
                })
                .cloned()
        })
    }

    /// Instance field named `name` anywhere in the hierarchy, ignoring accessibility
    pub(crate) fn find_instance_field_any(&self, name: &str) -> Option<FieldRc> {
        self.hierarchy().find_map(|ty| {
            ty.fields
                .iter()
                .map(|(_, field)| field)
                .find(|field| field.name == name && !field.is_static())
                .cloned()
        })
    }

    /// Constructors declared on this type that are visible under `filter`
    #[must_use]
    pub fn find_constructors(&self, filter: BindingFlags) -> Vec<ConstructorRc> {
        self.constructors
            .iter()
            .map(|(_, ctor)| ctor)
            .filter(|ctor| filter.admits(ctor.flags, false))
            .cloned()
            .collect()
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeType")
            .field("token", &self.token)
            .field("name", &self.fullname())
            .field("module", &self.module)
            .field("base", &self.base.as_ref().map(|base| base.fullname()))
            .field("fields", &self.fields.count())
            .field("methods", &self.methods.count())
            .field("properties", &self.properties.count())
            .field("constructors", &self.constructors.count())
            .finish()
    }
}

impl PartialEq for RuntimeType {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for RuntimeType {}

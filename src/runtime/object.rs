//! Instances of runtime types.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    runtime::{MemberKind, Token, TypeRc, Value},
    Result,
};

/// Reference to an [`Object`]
pub type ObjectRef = Arc<Object>;

/// An instance of a [`crate::runtime::RuntimeType`].
///
/// Field values are stored by field token, one slot for every instance field declared on the
/// type or any of its base types. Slots are created on allocation and never added or removed
/// afterwards; only their contents change.
pub struct Object {
    ty: TypeRc,
    fields: RwLock<HashMap<Token, Value>>,
}

impl Object {
    /// Allocate a new instance of `ty` with every instance field set to its default value.
    ///
    /// No constructor runs; see [`crate::runtime::Constructor::invoke`] for that.
    #[must_use]
    pub fn allocate(ty: &TypeRc) -> ObjectRef {
        let mut fields = HashMap::new();

        let mut current = Some(ty.as_ref());
        while let Some(level) = current {
            for (_, field) in level.fields.iter() {
                if !field.is_static() {
                    fields.insert(field.token, field.signature.default_value());
                }
            }
            current = level.base().map(Arc::as_ref);
        }

        Arc::new(Object {
            ty: ty.clone(),
            fields: RwLock::new(fields),
        })
    }

    /// The type this object is an instance of
    #[must_use]
    pub fn runtime_type(&self) -> &TypeRc {
        &self.ty
    }

    /// Read the slot of the field with `token`, if this object has one
    #[must_use]
    pub fn load(&self, token: Token) -> Option<Value> {
        let fields = self.fields.read().unwrap_or_else(PoisonError::into_inner);
        fields.get(&token).cloned()
    }

    /// Overwrite the slot of the field with `token`.
    ///
    /// Returns `false` if this object has no such slot.
    pub fn store(&self, token: Token, value: Value) -> bool {
        let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        match fields.get_mut(&token) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Read an instance field by name, regardless of its accessibility.
    ///
    /// Meant for method and constructor bodies, which have full access to their own type.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if no instance field named `name` exists on the
    /// type or its base types.
    pub fn get(&self, name: &str) -> Result<Value> {
        let field = self
            .ty
            .find_instance_field_any(name)
            .ok_or_else(|| not_found!(MemberKind::Field, self.ty.fullname(), name))?;
        self.load(field.token)
            .ok_or_else(|| not_found!(MemberKind::Field, self.ty.fullname(), name))
    }

    /// Write an instance field by name, regardless of its accessibility.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if the field does not exist, or
    /// [`crate::Error::TypeMismatch`] if `value` does not fit the field's type.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let field = self
            .ty
            .find_instance_field_any(name)
            .ok_or_else(|| not_found!(MemberKind::Field, self.ty.fullname(), name))?;
        if !field.signature.accepts(&value) {
            return Err(type_mismatch!(field.signature, value.type_name()));
        }
        self.store(field.token, value);
        Ok(())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Object")
            .field("type", &self.ty.fullname())
            .field("fields", &fields.len())
            .finish()
    }
}

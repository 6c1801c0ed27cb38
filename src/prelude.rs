//! # dotreflect Prelude
//!
//! This module provides a convenient prelude for the most commonly used types, traits and
//! functions of the dotreflect library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotreflect operations
pub use crate::Error;

/// The result type used throughout dotreflect
pub use crate::Result;

// ================================================================================================
// Deferred Reflection
// ================================================================================================

/// Memoizing cells and the trait that accepts either a handle or a cell
pub use crate::reflect::{value_of, Deferred, DeferredRc, HandleSource};

/// Deferred and eager lookups
pub use crate::reflect::{
    get_method, get_method_with, resolve_field, resolve_field_with, resolve_method,
    resolve_method_with, resolve_property, resolve_property_with, resolve_type,
};

/// Instance creation and field access
pub use crate::reflect::{create_instance, get_value};

/// Method invocation
pub use crate::reflect::{invoke, invoke_static, invoke_static_by_name};

// ================================================================================================
// Runtime Type System
// ================================================================================================

/// Modules, types and identities
pub use crate::runtime::{Module, ModuleRc, RuntimeType, Token, TypeRc};

/// Members
pub use crate::runtime::{
    Constructor, ConstructorRc, Field, FieldRc, MemberKind, Method, MethodRc, Property, PropertyRc,
};

/// Lookup filters and declared attributes
pub use crate::runtime::{BindingFlags, MemberAttributes};

/// Values, instances and coercion
pub use crate::runtime::{FromValue, Object, ObjectRef, TypeSignature, Value};

/// Type definition
pub use crate::runtime::ClassBuilder;

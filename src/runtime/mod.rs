//! Runtime type system.
//!
//! Rust has no runtime reflection, so the types that [`crate::reflect`] resolves and invokes
//! are described explicitly: a [`Module`] holds [`RuntimeType`]s, each of which declares
//! [`Field`]s, [`Method`]s, [`Property`]s and [`Constructor`]s whose bodies are Rust closures.
//! Instances are [`Object`]s with one [`Value`] slot per field.
//!
//! This module provides the lookup and invocation primitives only:
//!
//! - [`Module::get_type`] - find a type by qualified name
//! - [`RuntimeType::find_method`], [`RuntimeType::find_field`], [`RuntimeType::find_property`],
//!   [`RuntimeType::find_constructors`] - find members by name and [`BindingFlags`]
//! - [`Constructor::invoke`] - construct an instance
//! - [`Method::invoke`] - call a method with a receiver and arguments
//! - [`Field::get_value`] / [`Field::set_value`] - read and write fields
//!
//! Caching, deferral and result coercion live in [`crate::reflect`].
//!
//! # Examples
//!
//! ```rust
//! use dotreflect::runtime::{BindingFlags, ClassBuilder, Module, TypeSignature, Value};
//!
//! let module = Module::new("Tests");
//! let ty = ClassBuilder::new("Tests.Echo")
//!     .method("Echo", |m| {
//!         m.public()
//!             .static_method()
//!             .param("s", TypeSignature::String)
//!             .returns(TypeSignature::String)
//!             .body(|_, args| Ok(args[0].clone()))
//!     })
//!     .build(&module)?;
//!
//! let echo = ty.find_method("Echo", BindingFlags::PUBLIC_STATIC).unwrap();
//! assert_eq!(echo.invoke(None, &[Value::from("hi")])?, Value::from("hi"));
//! # Ok::<(), dotreflect::Error>(())
//! ```

mod builder;
mod flags;
mod member;
mod module;
mod object;
mod token;
mod ty;
mod value;

pub use builder::{ClassBuilder, ConstructorBuilder, MethodBuilder};
pub use flags::{BindingFlags, MemberAccess, MemberAttributes, MEMBER_ACCESS_MASK};
pub use member::{
    Constructor, ConstructorBody, ConstructorRc, Field, FieldRc, MemberKind, Method, MethodBody,
    MethodRc, Parameter, Property, PropertyRc,
};
pub use module::{Module, ModuleRc};
pub use object::{Object, ObjectRef};
pub use token::{Token, TokenKind};
pub use ty::{RuntimeType, TypeRc};
pub use value::{FromValue, TypeSignature, Value};

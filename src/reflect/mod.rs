//! Lazy, memoizing reflection over the [`crate::runtime`] type system.
//!
//! Lookups are described up front and resolved on first use. Each resolver returns a
//! [`DeferredRc`] cell; cells are chained module → type → member, and evaluating a cell
//! evaluates the cells it depends on. Whatever the first evaluation produces, a handle or an
//! error, is cached in the cell and returned on every later access.
//!
//! The terminal operations ([`create_instance`], [`invoke`], [`invoke_static`],
//! [`invoke_static_by_name`] and [`get_value`]) accept a handle or a cell through
//! [`HandleSource`] and coerce their result to a caller-chosen type through
//! [`crate::runtime::FromValue`]. They are never cached.
//!
//! # Errors
//!
//! An absent (`None`) module, type, member or cell fails right away with
//! [`crate::Error::NullInput`], before any deferred evaluation. Missing types and members fail
//! with [`crate::Error::MemberNotFound`] when the cell is evaluated. Missing or incompatible
//! receivers, arguments and results fail with [`crate::Error::TypeMismatch`].
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use dotreflect::prelude::*;
//!
//! let module = Arc::new(Module::new("Tests"));
//! ClassBuilder::new("Tests.Echo")
//!     .method("Say", |m| {
//!         m.public()
//!             .param("s", TypeSignature::String)
//!             .returns(TypeSignature::String)
//!             .body(|_, args| Ok(args[0].clone()))
//!     })
//!     .build(&module)?;
//!
//! let module = Arc::new(Deferred::ready(module));
//! let ty = resolve_type(Some(&module), "Tests.Echo")?;
//! let say = resolve_method(Some(&ty), "Say")?;
//! let missing = resolve_method(Some(&ty), "Missing")?;
//!
//! let echo: ObjectRef = create_instance(Some(&ty), &[])?;
//! let reply: String = invoke(Some(&say), Some(&echo), &["hello".into()])?;
//! assert_eq!(reply, "hello");
//!
//! // lookups happen on first access
//! assert!(matches!(missing.value(), Err(Error::MemberNotFound { .. })));
//! # Ok::<(), dotreflect::Error>(())
//! ```

mod access;
mod activator;
mod deferred;
mod invoke;
mod resolve;
mod source;

pub use access::get_value;
pub use activator::create_instance;
pub use deferred::{value_of, Deferred, DeferredRc};
pub use invoke::{invoke, invoke_static, invoke_static_by_name};
pub use resolve::{
    get_method, get_method_with, resolve_field, resolve_field_with, resolve_method,
    resolve_method_with, resolve_property, resolve_property_with, resolve_type,
};
pub use source::HandleSource;

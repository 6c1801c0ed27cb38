// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotreflect
//!
//! Lazy, memoizing reflection for a managed-style runtime type system.
//!
//! Looking up a type or member by name is described once and performed on first use. The
//! result of that first lookup, or its failure, is cached, so every later use costs a single
//! atomic load. On top of the cached handles sit uniform, type-checked operations to create
//! instances, invoke instance and static methods, and read fields.
//!
//! ## Features
//!
//! - **Deferred cells** - [`reflect::Deferred`] evaluates its resolver exactly once, even
//!   under concurrent access, and replays failures verbatim
//! - **Resolver chains** - module → type → method / property accessor / field
//! - **Binding filters** - public / non-public, instance / static, declared-only and
//!   hierarchy flattening via [`runtime::BindingFlags`]
//! - **Typed results** - every call coerces its result through [`runtime::FromValue`]
//! - **Small error taxonomy** - `NullInput`, `MemberNotFound` and `TypeMismatch`
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use dotreflect::prelude::*;
//!
//! let module = Arc::new(Module::new("Shop"));
//! ClassBuilder::new("Shop.Item")
//!     .field("_name", TypeSignature::String, MemberAttributes::PRIVATE)
//!     .property("Name", TypeSignature::String, "_name")
//!     .constructor(|c| {
//!         c.param("name", TypeSignature::String)
//!             .body(|this, args| this.set("_name", args[0].clone()))
//!     })
//!     .build(&module)?;
//!
//! let module = Arc::new(Deferred::ready(module));
//! let item = resolve_type(Some(&module), "Shop.Item")?;
//! let name = resolve_field_with(Some(&item), "_name", BindingFlags::NON_PUBLIC_INSTANCE)?;
//! let get_name = resolve_property(Some(&item), "Name", true)?;
//!
//! let apple: ObjectRef = create_instance(Some(&item), &["apple".into()])?;
//! let by_field: String = get_value(Some(&name), Some(&apple))?;
//! let by_property: String = invoke(Some(&get_name), Some(&apple), &[])?;
//! assert_eq!(by_field, "apple");
//! assert_eq!(by_property, "apple");
//! # Ok::<(), dotreflect::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`runtime`] - the type system being reflected over: modules, types, members, objects
//! - [`reflect`] - deferred resolution, instance creation, invocation and field access
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`]. Absent handles and cells fail immediately, missing
//! members fail when the cell that looks them up is evaluated:
//!
//! ```rust
//! use dotreflect::{prelude::*, Error};
//!
//! let err = resolve_method::<DeferredRc<TypeRc>>(None, "Run").unwrap_err();
//! assert_eq!(err, Error::NullInput("ty"));
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotreflect::prelude::*;
///
/// let module = Module::new("Tests");
/// let ty = ClassBuilder::new("Tests.Empty").build(&module)?;
/// let instance: ObjectRef = create_instance(Some(&ty), &[])?;
/// assert_eq!(instance.runtime_type().name, "Empty");
/// # Ok::<(), dotreflect::Error>(())
/// ```
pub mod prelude;

/// The runtime type system
///
/// Modules, types and their members, described explicitly and populated through
/// [`runtime::ClassBuilder`]. Provides the raw lookup and invocation primitives that
/// [`reflect`] caches and wraps.
///
/// # Key Types
///
/// - [`runtime::Module`] - a named collection of types, indexed by full name
/// - [`runtime::RuntimeType`] - a class with fields, methods, properties and constructors
/// - [`runtime::BindingFlags`] - the filter that selects which members a lookup can see
/// - [`runtime::Value`] / [`runtime::FromValue`] - dynamic values and their coercion
pub mod runtime;

/// Deferred reflection
///
/// Resolvers that return memoizing [`reflect::Deferred`] cells, and the terminal operations
/// that consume them.
///
/// # Main Functions
///
/// - [`reflect::resolve_type`] - defer a type lookup
/// - [`reflect::resolve_method`], [`reflect::resolve_property`], [`reflect::resolve_field`] -
///   defer member lookups
/// - [`reflect::create_instance`] - construct an instance
/// - [`reflect::invoke`], [`reflect::invoke_static`], [`reflect::invoke_static_by_name`] -
///   call methods
/// - [`reflect::get_value`] - read fields
pub mod reflect;

/// `dotreflect` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
///
/// # Example
///
/// ```rust
/// use dotreflect::{reflect::get_method, runtime::{MethodRc, TypeRc}, Result};
///
/// fn entry_point(ty: &TypeRc) -> Result<MethodRc> {
///     get_method(Some(ty), "Main")
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `dotreflect` Error type
///
/// The main error type for all operations in this crate. It is `Clone` and `PartialEq`, so
/// that failures cached by a deferred cell can be handed out again and compared.
///
/// # Example
///
/// ```rust
/// use dotreflect::{prelude::*, Error};
///
/// let module = Module::new("Tests");
/// let ty = ClassBuilder::new("Tests.Empty").build(&module)?;
///
/// match get_method(Some(&ty), "Run") {
///     Ok(method) => println!("found {}", method.fullname()),
///     Err(Error::MemberNotFound { kind, owner, name }) => println!("no {kind} {owner}.{name}"),
///     Err(e) => println!("Error: {}", e),
/// }
/// # Ok::<(), dotreflect::Error>(())
/// ```
pub use error::Error;

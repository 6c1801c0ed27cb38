//! Deferred type and member resolution.
//!
//! Each resolver takes its input (a module or type, directly or as a cell) and returns a new
//! [`DeferredRc`] that performs the lookup on first access. Inputs are checked for `None`
//! right away; the lookup itself, and therefore [`crate::Error::MemberNotFound`], only happens
//! when the returned cell is evaluated. A failing input cell makes every downstream cell fail
//! with the same error.
//!
//! Resolvers without a `_with` suffix use [`BindingFlags::default()`] (public instance
//! members). Private or static members need an explicit filter.

use std::sync::Arc;

use crate::{
    reflect::{Deferred, DeferredRc, HandleSource},
    runtime::{BindingFlags, FieldRc, MemberKind, MethodRc, ModuleRc, TypeRc},
    Error, Result,
};

fn miss(kind: MemberKind, owner: &str, name: &str, filter: BindingFlags) -> Error {
    tracing::debug!(%kind, owner, name, %filter, "lookup missed");
    not_found!(kind, owner, name)
}

fn find_type(module: &ModuleRc, fullname: &str) -> Result<TypeRc> {
    module.get_type(fullname).ok_or_else(|| {
        tracing::debug!(module = %module.name, fullname, "type lookup missed");
        not_found!(MemberKind::Type, module.name, fullname)
    })
}

fn find_method(ty: &TypeRc, name: &str, filter: BindingFlags) -> Result<MethodRc> {
    let method = ty
        .find_method(name, filter)
        .ok_or_else(|| miss(MemberKind::Method, &ty.fullname(), name, filter))?;
    tracing::trace!(method = %method.fullname(), token = %method.token, "resolved method");
    Ok(method)
}

fn find_accessor(
    ty: &TypeRc,
    name: &str,
    want_getter: bool,
    filter: BindingFlags,
) -> Result<MethodRc> {
    let property = ty
        .find_property(name, filter)
        .ok_or_else(|| miss(MemberKind::Property, &ty.fullname(), name, filter))?;

    let kind = if want_getter {
        MemberKind::PropertyGetter
    } else {
        MemberKind::PropertySetter
    };

    property
        .accessor(want_getter)
        .filter(|accessor| filter.admits(accessor.flags, accessor.declaring_type != ty.token))
        .cloned()
        .ok_or_else(|| miss(kind, &ty.fullname(), name, filter))
}

fn find_field(ty: &TypeRc, name: &str, filter: BindingFlags) -> Result<FieldRc> {
    ty.find_field(name, filter)
        .ok_or_else(|| miss(MemberKind::Field, &ty.fullname(), name, filter))
}

/// Defer the lookup of the type `fullname` in `module`.
///
/// # Errors
/// Returns [`crate::Error::NullInput`] immediately if `module` is `None`. Evaluating the cell
/// fails with [`crate::Error::MemberNotFound`] if the module has no such type.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dotreflect::{reflect::{resolve_type, Deferred}, runtime::{ClassBuilder, Module}};
///
/// let module = Arc::new(Module::new("Tests"));
/// ClassBuilder::new("Tests.Widget").build(&module)?;
///
/// let module_cell = Arc::new(Deferred::ready(module));
/// let widget = resolve_type(Some(&module_cell), "Tests.Widget")?;
/// let gadget = resolve_type(Some(&module_cell), "Tests.Gadget")?;
///
/// assert_eq!(widget.value()?.name, "Widget");
/// assert!(gadget.value().is_err());
/// # Ok::<(), dotreflect::Error>(())
/// ```
pub fn resolve_type<S>(module: Option<&S>, fullname: &str) -> Result<DeferredRc<TypeRc>>
where
    S: HandleSource<ModuleRc> + Clone + Send + 'static,
{
    let module = module.ok_or(null_input!("module"))?.clone();
    let fullname = fullname.to_string();

    Ok(Arc::new(Deferred::new(move || {
        find_type(&module.handle()?, &fullname)
    })))
}

/// Defer the lookup of the public instance method `name`.
///
/// # Errors
/// See [`resolve_method_with`].
pub fn resolve_method<S>(ty: Option<&S>, name: &str) -> Result<DeferredRc<MethodRc>>
where
    S: HandleSource<TypeRc> + Clone + Send + 'static,
{
    resolve_method_with(ty, name, BindingFlags::default())
}

/// Defer the lookup of the method `name` visible under `filter`.
///
/// # Errors
/// Returns [`crate::Error::NullInput`] immediately if `ty` is `None`. Evaluating the cell
/// fails with [`crate::Error::MemberNotFound`] if no such method is visible under `filter`.
pub fn resolve_method_with<S>(
    ty: Option<&S>,
    name: &str,
    filter: BindingFlags,
) -> Result<DeferredRc<MethodRc>>
where
    S: HandleSource<TypeRc> + Clone + Send + 'static,
{
    let ty = ty.ok_or(null_input!("ty"))?.clone();
    let name = name.to_string();

    Ok(Arc::new(Deferred::new(move || {
        find_method(&ty.handle()?, &name, filter)
    })))
}

/// Defer the lookup of an accessor of the public instance property `name`.
///
/// # Errors
/// See [`resolve_property_with`].
pub fn resolve_property<S>(
    ty: Option<&S>,
    name: &str,
    want_getter: bool,
) -> Result<DeferredRc<MethodRc>>
where
    S: HandleSource<TypeRc> + Clone + Send + 'static,
{
    resolve_property_with(ty, name, want_getter, BindingFlags::default())
}

/// Defer the lookup of the getter (`want_getter`) or setter of the property `name`.
///
/// # Errors
/// Returns [`crate::Error::NullInput`] immediately if `ty` is `None`. Evaluating the cell
/// fails with [`crate::Error::MemberNotFound`] if the property is not visible under `filter`,
/// or if it has no visible accessor of the requested kind.
pub fn resolve_property_with<S>(
    ty: Option<&S>,
    name: &str,
    want_getter: bool,
    filter: BindingFlags,
) -> Result<DeferredRc<MethodRc>>
where
    S: HandleSource<TypeRc> + Clone + Send + 'static,
{
    let ty = ty.ok_or(null_input!("ty"))?.clone();
    let name = name.to_string();

    Ok(Arc::new(Deferred::new(move || {
        find_accessor(&ty.handle()?, &name, want_getter, filter)
    })))
}

/// Defer the lookup of the public instance field `name`.
///
/// # Errors
/// See [`resolve_field_with`].
pub fn resolve_field<S>(ty: Option<&S>, name: &str) -> Result<DeferredRc<FieldRc>>
where
    S: HandleSource<TypeRc> + Clone + Send + 'static,
{
    resolve_field_with(ty, name, BindingFlags::default())
}

/// Defer the lookup of the field `name` visible under `filter`.
///
/// # Errors
/// Returns [`crate::Error::NullInput`] immediately if `ty` is `None`. Evaluating the cell
/// fails with [`crate::Error::MemberNotFound`] if no such field is visible under `filter`.
pub fn resolve_field_with<S>(
    ty: Option<&S>,
    name: &str,
    filter: BindingFlags,
) -> Result<DeferredRc<FieldRc>>
where
    S: HandleSource<TypeRc> + Clone + Send + 'static,
{
    let ty = ty.ok_or(null_input!("ty"))?.clone();
    let name = name.to_string();

    Ok(Arc::new(Deferred::new(move || {
        find_field(&ty.handle()?, &name, filter)
    })))
}

/// Look up the public instance method `name` right away.
///
/// # Errors
/// See [`get_method_with`].
pub fn get_method<S>(ty: Option<&S>, name: &str) -> Result<MethodRc>
where
    S: HandleSource<TypeRc> + ?Sized,
{
    get_method_with(ty, name, BindingFlags::default())
}

/// Look up the method `name` visible under `filter` right away.
///
/// # Errors
/// Returns [`crate::Error::NullInput`] if `ty` is `None`, the error of `ty` if it is a failed
/// cell, and [`crate::Error::MemberNotFound`] if no such method is visible under `filter`.
pub fn get_method_with<S>(ty: Option<&S>, name: &str, filter: BindingFlags) -> Result<MethodRc>
where
    S: HandleSource<TypeRc> + ?Sized,
{
    let ty = ty.ok_or(null_input!("ty"))?.handle()?;
    find_method(&ty, name, filter)
}

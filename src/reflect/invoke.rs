//! Method invocation with typed results.

use crate::{
    reflect::{get_method_with, HandleSource},
    runtime::{BindingFlags, FromValue, MethodRc, ObjectRef, TypeRc, Value},
    Result,
};

/// Call the instance method `method` on `receiver` and coerce the result to `R`.
///
/// `method` may be a method handle or a deferred method cell.
///
/// # Errors
/// - [`crate::Error::NullInput`] if `method` is `None`
/// - the error of `method` if it is a failed cell
/// - [`crate::Error::TypeMismatch`] if `receiver` is `None` or not an instance of the
///   declaring type, if `args` does not fit the parameters, or if the result cannot be
///   coerced to `R`
/// - any error raised by the method body
///
/// # Examples
///
/// ```rust
/// use dotreflect::{
///     reflect::{create_instance, get_method, invoke},
///     runtime::{ClassBuilder, FromValue, Module, ObjectRef, TypeSignature},
/// };
///
/// let module = Module::new("Tests");
/// let ty = ClassBuilder::new("Tests.Calculator")
///     .method("Twice", |m| {
///         m.public()
///             .param("n", TypeSignature::I4)
///             .returns(TypeSignature::I4)
///             .body(|_, args| Ok((2 * i32::from_value(args[0].clone())?).into()))
///     })
///     .build(&module)?;
///
/// let calc: ObjectRef = create_instance(Some(&ty), &[])?;
/// let twice = get_method(Some(&ty), "Twice")?;
/// let result: i32 = invoke(Some(&twice), Some(&calc), &[21.into()])?;
/// assert_eq!(result, 42);
/// # Ok::<(), dotreflect::Error>(())
/// ```
pub fn invoke<R, M>(method: Option<&M>, receiver: Option<&ObjectRef>, args: &[Value]) -> Result<R>
where
    R: FromValue,
    M: HandleSource<MethodRc> + ?Sized,
{
    let method = method.ok_or(null_input!("method"))?.handle()?;

    let result = method.invoke(receiver, args)?;
    R::from_value(result)
}

/// Call the static method `method` and coerce the result to `R`.
///
/// # Errors
/// The same as [`invoke`], minus everything concerning the receiver.
pub fn invoke_static<R, M>(method: Option<&M>, args: &[Value]) -> Result<R>
where
    R: FromValue,
    M: HandleSource<MethodRc> + ?Sized,
{
    let method = method.ok_or(null_input!("method"))?.handle()?;

    let result = method.invoke(None, args)?;
    R::from_value(result)
}

/// Look up the public static method `name` on `ty`, call it and coerce the result to `R`.
///
/// # Errors
/// [`crate::Error::NullInput`] if `ty` is `None`, [`crate::Error::MemberNotFound`] if there
/// is no such public static method, and everything [`invoke_static`] reports.
pub fn invoke_static_by_name<R, S>(ty: Option<&S>, name: &str, args: &[Value]) -> Result<R>
where
    R: FromValue,
    S: HandleSource<TypeRc> + ?Sized,
{
    let method = get_method_with(ty, name, BindingFlags::PUBLIC_STATIC)?;
    invoke_static(Some(&method), args)
}

//! Instance creation.
//!
//! [`create_instance`] picks the public instance constructor whose parameter list best fits
//! the supplied arguments and coerces the new object to the requested result type.
//!
//! Candidates must have exactly as many parameters as there are arguments, and every argument
//! must be assignable to its parameter. Among the candidates the one with the highest total
//! [`TypeSignature::match_score`] wins; ties go to the constructor declared first.
//!
//! [`TypeSignature::match_score`]: crate::runtime::TypeSignature::match_score

use crate::{
    reflect::HandleSource,
    runtime::{BindingFlags, ConstructorRc, FromValue, MemberKind, TypeRc, Value},
    Result,
};

fn score(ctor: &ConstructorRc, args: &[Value]) -> Option<u32> {
    if ctor.params.len() != args.len() {
        return None;
    }

    ctor.params
        .iter()
        .zip(args)
        .map(|(param, arg)| param.signature.match_score(arg).map(u32::from))
        .sum()
}

fn select_constructor(ty: &TypeRc, args: &[Value]) -> Option<ConstructorRc> {
    let mut best: Option<(u32, ConstructorRc)> = None;

    for ctor in ty.find_constructors(BindingFlags::default()) {
        let Some(score) = score(&ctor, args) else {
            continue;
        };
        if best.as_ref().map_or(true, |(top, _)| score > *top) {
            best = Some((score, ctor));
        }
    }

    best.map(|(_, ctor)| ctor)
}

/// Create an instance of `ty` with the constructor matching `args`, and coerce it to `R`.
///
/// `ty` may be a type handle or a deferred type cell; a cell is evaluated first.
///
/// # Errors
/// - [`crate::Error::NullInput`] if `ty` is `None`
/// - the error of `ty` if it is a failed cell
/// - [`crate::Error::MemberNotFound`] if no public instance constructor accepts `args`
/// - [`crate::Error::TypeMismatch`] if the new object cannot be coerced to `R`
/// - any error raised by the constructor body
///
/// # Examples
///
/// ```rust
/// use dotreflect::{
///     reflect::create_instance,
///     runtime::{ClassBuilder, MemberAttributes, Module, ObjectRef, TypeSignature, Value},
/// };
///
/// let module = Module::new("Tests");
/// let ty = ClassBuilder::new("Tests.Point")
///     .field("X", TypeSignature::I4, MemberAttributes::PUBLIC)
///     .constructor(|c| {
///         c.param("x", TypeSignature::I4)
///             .body(|this, args| this.set("X", args[0].clone()))
///     })
///     .build(&module)?;
///
/// let point: ObjectRef = create_instance(Some(&ty), &[Value::from(4)])?;
/// assert_eq!(point.get("X")?, Value::from(4));
/// # Ok::<(), dotreflect::Error>(())
/// ```
pub fn create_instance<R, S>(ty: Option<&S>, args: &[Value]) -> Result<R>
where
    R: FromValue,
    S: HandleSource<TypeRc> + ?Sized,
{
    let ty = ty.ok_or(null_input!("ty"))?.handle()?;

    let ctor = select_constructor(&ty, args).ok_or_else(|| {
        tracing::debug!(ty = %ty.fullname(), args = args.len(), "no matching constructor");
        not_found!(MemberKind::Constructor, ty.fullname(), ".ctor")
    })?;

    let object = ctor.invoke(args)?;
    R::from_value(Value::Object(object))
}

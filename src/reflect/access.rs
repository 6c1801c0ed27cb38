//! Field reads with typed results.

use crate::{
    reflect::HandleSource,
    runtime::{FieldRc, FromValue, ObjectRef},
    Result,
};

/// Read the current value of `field` on `receiver` and coerce it to `R`.
///
/// `field` may be a field handle or a deferred field cell. Static fields ignore `receiver`.
///
/// # Errors
/// - [`crate::Error::NullInput`] if `field` is `None`
/// - the error of `field` if it is a failed cell
/// - [`crate::Error::TypeMismatch`] if an instance field is read without a receiver or from
///   an object of the wrong type, or if the value cannot be coerced to `R`
pub fn get_value<R, F>(field: Option<&F>, receiver: Option<&ObjectRef>) -> Result<R>
where
    R: FromValue,
    F: HandleSource<FieldRc> + ?Sized,
{
    let field = field.ok_or(null_input!("field"))?.handle()?;

    let value = field.get_value(receiver)?;
    tracing::trace!(field = %field.name, owner = %field.declaring_name, "read field");
    R::from_value(value)
}

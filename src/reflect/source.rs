use std::sync::Arc;

use crate::{
    reflect::Deferred,
    runtime::{Constructor, Field, Method, Module, RuntimeType},
    Result,
};

/// Anything that yields a concrete handle of type `T`: the handle itself, or a deferred cell
/// producing it.
///
/// This lets the factory, invoker and accessor functions take either form, as in
/// `invoke(Some(&method), ..)` and `invoke(Some(&method_cell), ..)`.
pub trait HandleSource<T> {
    /// Produce the handle, evaluating a deferred cell if needed
    ///
    /// # Errors
    /// Whatever error the underlying cell captured.
    fn handle(&self) -> Result<T>;
}

impl<T: Clone> HandleSource<T> for Deferred<T> {
    fn handle(&self) -> Result<T> {
        self.get()
    }
}

impl<T: Clone> HandleSource<T> for Arc<Deferred<T>> {
    fn handle(&self) -> Result<T> {
        self.get()
    }
}

macro_rules! direct_handle {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HandleSource<Arc<$ty>> for Arc<$ty> {
                fn handle(&self) -> Result<Arc<$ty>> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

direct_handle!(Module, RuntimeType, Method, Field, Constructor);

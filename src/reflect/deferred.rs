//! Single-assignment, lazily evaluated cells that memoize success and failure alike.
//!
//! A [`Deferred<T>`] wraps a resolution function. The first call to [`Deferred::value`] runs
//! it; the produced value, or the error it returned, is stored and handed out on every later
//! call without running the function again. This holds under concurrent access: callers that
//! race on an unevaluated cell block until the single evaluation finishes and then all observe
//! the same outcome.
//!
//! Failures are never retried. A cell whose lookup failed keeps failing with the same error
//! even if the looked-up entity appears later.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use dotreflect::reflect::Deferred;
//!
//! let runs = Arc::new(AtomicUsize::new(0));
//! let counter = runs.clone();
//! let cell = Deferred::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok(42)
//! });
//!
//! assert!(!cell.is_evaluated());
//! assert_eq!(*cell.value()?, 42);
//! assert_eq!(*cell.value()?, 42);
//! assert_eq!(runs.load(Ordering::SeqCst), 1);
//! # Ok::<(), dotreflect::Error>(())
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::{Error, Result};

/// Reference to a [`Deferred`] cell, the form in which cells are chained
pub type DeferredRc<T> = Arc<Deferred<T>>;

type Resolver<T> = Box<dyn FnOnce() -> Result<T> + Send>;

/// A lazily evaluated, memoizing cell. See the [module documentation](self).
pub struct Deferred<T> {
    resolver: Mutex<Option<Resolver<T>>>,
    outcome: OnceLock<Result<T>>,
}

impl<T> Deferred<T> {
    /// Create a cell that runs `resolve` on first access
    pub fn new<F>(resolve: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        Deferred {
            resolver: Mutex::new(Some(Box::new(resolve))),
            outcome: OnceLock::new(),
        }
    }

    /// Create a cell from a resolver that may be absent.
    ///
    /// # Errors
    /// Returns [`Error::NullInput`] immediately if `resolve` is `None`.
    pub fn try_new<F>(resolve: Option<F>) -> Result<Self>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        resolve.map(Deferred::new).ok_or(null_input!("resolve"))
    }

    /// Create a cell that is already evaluated to `value`
    pub fn ready(value: T) -> Self {
        Deferred {
            resolver: Mutex::new(None),
            outcome: OnceLock::from(Ok(value)),
        }
    }

    /// Returns `true` once the outcome of this cell is fixed
    pub fn is_evaluated(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Get the value, evaluating the resolver on first access.
    ///
    /// # Errors
    /// Returns the error the resolver produced, on this and every later call. Returns
    /// [`Error::LockError`] if the resolver panicked during an earlier call.
    pub fn value(&self) -> Result<&T> {
        let outcome = self.outcome.get_or_init(|| {
            let resolver = self
                .resolver
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();

            match resolver {
                Some(resolve) => {
                    tracing::debug!(ty = std::any::type_name::<T>(), "evaluating deferred cell");
                    let outcome = resolve();
                    if let Err(error) = &outcome {
                        tracing::debug!(%error, "deferred cell failed");
                    }
                    outcome
                }
                None => Err(Error::LockError),
            }
        });

        match outcome {
            Ok(value) => Ok(value),
            Err(error) => Err(error.clone()),
        }
    }
}

impl<T: Clone> Deferred<T> {
    /// Get an owned copy of the value. See [`Deferred::value`].
    ///
    /// # Errors
    /// The same as [`Deferred::value`].
    pub fn get(&self) -> Result<T> {
        self.value().cloned()
    }
}

impl<T> From<T> for Deferred<T> {
    fn from(value: T) -> Self {
        Deferred::ready(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome.get() {
            None => f.write_str("Deferred(<unevaluated>)"),
            Some(Ok(value)) => f.debug_tuple("Deferred").field(value).finish(),
            Some(Err(error)) => f.debug_tuple("Deferred").field(error).finish(),
        }
    }
}

/// Get the value of a cell that may be absent.
///
/// The `None` check happens before, and independently of, any deferred evaluation.
///
/// # Errors
/// Returns [`Error::NullInput`] if `cell` is `None`, otherwise whatever [`Deferred::value`]
/// returns.
pub fn value_of<T>(cell: Option<&Deferred<T>>) -> Result<&T> {
    cell.ok_or(null_input!("cell"))?.value()
}

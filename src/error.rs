use thiserror::Error;

use crate::runtime::{MemberKind, TokenKind};

macro_rules! null_input {
    ($arg:expr) => {
        crate::Error::NullInput($arg)
    };
}

macro_rules! not_found {
    ($kind:expr, $owner:expr, $name:expr) => {
        crate::Error::MemberNotFound {
            kind: $kind,
            owner: $owner.to_string(),
            name: $name.to_string(),
        }
    };
}

macro_rules! type_mismatch {
    ($expected:expr, $found:expr) => {
        crate::Error::TypeMismatch {
            expected: $expected.to_string(),
            found: $found.to_string(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The reflection layer itself only ever produces three kinds of failure:
///
/// - [`Error::NullInput`] - a required handle, cell or module argument was `None`. This is
///   always reported synchronously, before any deferred evaluation takes place.
/// - [`Error::MemberNotFound`] - a type or member does not exist under the effective binding
///   filter. Reported when a deferred cell is first evaluated, and replayed afterwards.
/// - [`Error::TypeMismatch`] - a value could not be coerced to the requested type, or a call
///   was dispatched with an incompatible receiver or argument list.
///
/// [`Error::TypeInsert`] and [`Error::TokenExhausted`] only originate in the runtime type
/// system. [`Error::LockError`] is returned by a cell whose resolver panicked.
///
/// The type is `Clone` so that a [`crate::reflect::Deferred`] cell can hand out the exact
/// failure it captured on every access.
///
/// # Examples
///
/// ```rust
/// use dotreflect::{Error, runtime::MemberKind};
///
/// let err = Error::MemberNotFound {
///     kind: MemberKind::Method,
///     owner: "Tests.TestClass".to_string(),
///     name: "Missing".to_string(),
/// };
/// assert_eq!(err.to_string(), "Method `Missing` not found on `Tests.TestClass`");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument was `None`.
    ///
    /// The associated value names the argument that was missing.
    #[error("Required argument `{0}` was null")]
    NullInput(&'static str),

    /// The requested type or member could not be found.
    ///
    /// Members that exist but are excluded by the binding filter (e.g. a private method
    /// looked up with the default public-instance filter) are reported the same way.
    #[error("{kind} `{name}` not found on `{owner}`")]
    MemberNotFound {
        /// What kind of entity was looked up
        kind: MemberKind,
        /// Full name of the type (or module) that was searched
        owner: String,
        /// Name that was requested
        name: String,
    },

    /// A value, receiver or argument list was incompatible with the expected type.
    #[error("Type mismatch - expected {expected}, found {found}")]
    TypeMismatch {
        /// Description of the type that was expected
        expected: String,
        /// Description of what was actually provided
        found: String,
    },

    /// Failed to insert a new type into a `Module`.
    ///
    /// The associated value is the full name that is already taken.
    #[error("Failed to insert new type into Module - {0}")]
    TypeInsert(String),

    /// Every row of a token table has been handed out.
    ///
    /// The associated value names the exhausted table.
    #[error("No free rows left in the {0} token table")]
    TokenExhausted(TokenKind),

    /// A deferred resolver panicked during an earlier evaluation and can not be re-run.
    #[error("Deferred resolver panicked during an earlier evaluation")]
    LockError,
}

use std::fmt;

use crate::value::Kind;

/// Errors surfaced by factories, guarded views and user-supplied class code.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A value did not have the kind an operation requires
    TypeConstraint(TypeConstraintError),
    /// An error raised by a constructor or method of a class definition
    Raised(Raised),
}

impl Error {
    /// Creates an error as raised by user code (constructors, methods, policies).
    ///
    /// The factory and guarded views propagate these untouched.
    pub fn raise(message: impl Into<String>) -> Self {
        Error::Raised(Raised::new(message))
    }

    /// Creates a type-constraint error describing expected vs. actual kind.
    pub fn type_constraint(expected: Kind, actual: Kind) -> Self {
        Error::TypeConstraint(TypeConstraintError::new(expected, actual))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeConstraint(e) => write!(f, "TypeError: {}", e),
            Error::Raised(r) => write!(f, "{}", r),
        }
    }
}

impl std::error::Error for Error {}

impl From<TypeConstraintError> for Error {
    fn from(e: TypeConstraintError) -> Self {
        Error::TypeConstraint(e)
    }
}

impl From<Raised> for Error {
    fn from(r: Raised) -> Self {
        Error::Raised(r)
    }
}

/// A value had the wrong kind.
///
/// The message names both kinds, e.g. `Expected Function, got undefined.`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeConstraintError {
    /// The kind the operation requires
    pub expected: Kind,
    /// The kind that was actually supplied
    pub actual: Kind,
}

impl TypeConstraintError {
    /// Creates a new type-constraint error.
    pub fn new(expected: Kind, actual: Kind) -> Self {
        Self { expected, actual }
    }
}

impl fmt::Display for TypeConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expected {}, got {}.", self.expected, self.actual)
    }
}

impl std::error::Error for TypeConstraintError {}

/// An error raised from inside class code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raised {
    /// Human-readable message supplied by the raising code
    pub message: String,
}

impl Raised {
    /// Creates a new raised error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Raised {}

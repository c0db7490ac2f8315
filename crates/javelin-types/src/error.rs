use thiserror::Error;

pub type Result<T, E = TypeError> = std::result::Result<T, E>;

/// Errors raised by the type model.
///
/// None of these are recoverable data problems: they signal a caller that violated the
/// model's contract (or a front-end that handed over malformed declarations). Rule engines
/// should report them as tool-internal defects rather than as rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    #[error("illegal state: {0}")]
    IllegalState(String),
    #[error("`{class}` expects {expected} type arguments, found {found}")]
    ArityMismatch {
        class: String,
        expected: usize,
        found: usize,
    },
    /// Raised by [`crate::DeclLoader`] when a declaration names a type variable that neither
    /// it nor its enclosing method declares. `class` is the declaration being loaded.
    #[error("`{class}` mentions undeclared type variable `{name}`")]
    UndeclaredTypeVariable { class: String, name: String },
}

impl TypeError {
    pub(crate) fn illegal_state(message: impl Into<String>) -> Self {
        TypeError::IllegalState(message.into())
    }
}

use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[herald_derive::herald_error]
pub enum EventBusError {
    /// Occurs when a registry handle does not downcast to the handler list of its key.
    /// This indicates an invariant violation in the type registry.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A priority name could not be parsed.
    #[error("Invalid priority{}: {message}", format_context(.context))]
    InvalidPriority { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

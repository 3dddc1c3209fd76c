//! Message-only error kinds
//!
//! Each kind renders its message verbatim; caller decoration comes from the
//! wrap layer its constructor macro adds.

macro_rules! message_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        #[error("{message}")]
        pub struct $name {
            message: String,
        }

        impl $name {
            /// Create the unwrapped error
            pub fn new(message: impl Into<String>) -> Self {
                Self {
                    message: message.into(),
                }
            }

            /// Get the error message
            pub fn message(&self) -> &str {
                &self.message
            }
        }
    };
}

message_kind! {
    /// A generic application failure, see [`application_error!`](crate::application_error!)
    ApplicationError
}

message_kind! {
    /// A state precondition was violated, see [`conflict_error!`](crate::conflict_error!)
    ConflictError
}

message_kind! {
    /// Access is denied by policy, see [`forbidden_error!`](crate::forbidden_error!)
    ForbiddenError
}

message_kind! {
    /// The caller's identity lacks permission, see
    /// [`not_authorized_error!`](crate::not_authorized_error!)
    NotAuthorizedError
}

message_kind! {
    /// A referenced entity is absent, see [`not_found_error!`](crate::not_found_error!)
    NotFoundError
}

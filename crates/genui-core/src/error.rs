//! Unified error type exposed by **`genui-core`**.
//!
//! Provider crates convert their internal errors into one of these variants
//! before bubbling them up to the dispatcher. The variants follow the failure
//! taxonomy of a dispatch:
//!
//! * registry problems at startup ([`GenuiError::DuplicateName`]),
//! * model unpredictability ([`GenuiError::UnknownFunction`],
//!   [`GenuiError::ArgumentValidation`]),
//! * the provider stream breaking ([`GenuiError::Transport`]).

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GenuiError>;

#[derive(Debug, Error)]
pub enum GenuiError {
    /// A function schema with the same name is already registered.
    #[error("function `{name}` is already registered")]
    DuplicateName { name: String },

    /// The provider named an operation the registry doesn't know.
    #[error("function `{name}` is not registered")]
    UnknownFunction { name: String },

    /// The provider's function-call arguments don't decode into the
    /// registered argument type.
    #[error("invalid arguments for function `{name}`: {diagnostic} (raw: {raw_arguments})")]
    ArgumentValidation {
        name: String,
        raw_arguments: serde_json::Value,
        diagnostic: String,
    },

    /// The provider stream failed or ended before a terminal signal.
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The selected backend does not recognise or support the requested
    /// `model`.
    #[error("provider `{provider}` does not support model `{model}`")]
    ModelNotSupported { provider: &'static str, model: String },

    /// Failure while serialising or deserialising JSON payloads.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid: {0}")]
    Invalid(String),

    /// A background task owned by a session panicked or was cancelled.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl GenuiError {
    /// Build a [`GenuiError::Transport`] from a plain message.
    pub fn transport(message: impl Into<String>) -> Self {
        GenuiError::Transport(message.into().into())
    }

    /// `true` for errors that mean the user received no answer and may retry.
    pub fn is_transport(&self) -> bool {
        matches!(self, GenuiError::Transport(_))
    }
}

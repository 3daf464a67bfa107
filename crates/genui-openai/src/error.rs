use genui_core::error::GenuiError;
use reqwest::StatusCode;

/// High-level error type covering every failure mode the client can hit.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t (de)serialise payload: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("OpenAI returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("event stream is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("OpenAI format error: {0}")]
    Format(String),
}

/// Everything that goes wrong while talking to OpenAI means the user got no
/// answer, so it surfaces as a transport error.
impl From<OpenAiError> for GenuiError {
    fn from(value: OpenAiError) -> Self {
        GenuiError::Transport(Box::new(value))
    }
}

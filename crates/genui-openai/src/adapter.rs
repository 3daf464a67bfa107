use std::{env, sync::Arc, time::Duration};

use genui_core::error::{GenuiError, Result};

use crate::client::{DEFAULT_TIMEOUT, OpenAiClient};

/// Wires the HTTP client [`OpenAiClient`] into a value that implements
/// [`genui_core::provider::StreamingEventsProvider`].
///
/// All user-facing functionality sits on
/// [`genui_core::dispatcher::Dispatcher`] once the adapter is plugged in.
#[derive(Debug)]
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
}

impl OpenAiAdapter {
    pub fn from_client(client: OpenAiClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// Builder for [`OpenAiAdapter`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use genui_openai::OpenAiAdapterBuilder;
///
/// let backend = OpenAiAdapterBuilder::new_from_env()
///     .build()
///     .expect("OPENAI_API_KEY must be set");
/// ```
#[derive(Debug, Default)]
pub struct OpenAiAdapterBuilder {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) timeout: Option<Duration>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `OPENAI_API_KEY` and, if set, `OPENAI_BASE_URL` from the
    /// environment. Missing keys only surface during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").ok(),
            base_url: env::var("OPENAI_BASE_URL").ok().filter(|url| !url.is_empty()),
            timeout: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Upper bound for one whole streamed completion. Defaults to 60 s.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`GenuiError::Invalid`] – if the API key is missing.
    /// * [`GenuiError::Transport`] – if the HTTP client can't be built.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(GenuiError::Invalid(
                "missing env variable: `OPENAI_API_KEY`".into(),
            ))?;

        let mut client = OpenAiClient::with_timeout(api_key, self.timeout.unwrap_or(DEFAULT_TIMEOUT))?;
        if let Some(base_url) = self.base_url {
            client = client.with_base_url(base_url);
        }

        Ok(OpenAiAdapter::from_client(client))
    }
}

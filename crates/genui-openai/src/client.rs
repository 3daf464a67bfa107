use async_stream::try_stream;

use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{
    Client as HttpClient,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;

use crate::{
    api_v1::{ChatCompletionChunkResponse, ChatCompletionRequest},
    error::OpenAiError,
    sse::{SseDecoder, SseFrame},
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound for one whole streamed completion.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Minimal HTTP client for OpenAI’s streaming *chat/completions* endpoint.
///
/// * Accepts the `api_v1` request structs and yields parsed chunks.
/// * Shares a single `reqwest::Client`, so cloning `OpenAiClient` is cheap.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: HttpClient,
    base: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Client with the default 60 s timeout and Rustls TLS.
    pub fn new(api_key: impl Into<String>) -> Result<Self, OpenAiError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, OpenAiError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self::with_http(api_key, http, None))
    }

    /// Build with a custom `reqwest::Client` in case the caller needs proxy
    /// settings, custom TLS, etc.
    pub fn with_http(
        api_key: impl Into<String>,
        http: HttpClient,
        base_url: Option<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            http,
            base: trim_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)),
        }
    }

    /// Point the client at an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base = trim_base_url(&base_url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn headers(&self) -> Result<HeaderMap, OpenAiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        Ok(headers)
    }

    /// Perform a **streaming** chat completion.
    ///
    /// The request is sent on first poll. The stream ends after `[DONE]`, or
    /// when the server closes the connection.
    pub fn chat_completion_stream(
        &self,
        mut request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunkResponse, OpenAiError>> + Send + '_ {
        request.stream = Some(true);
        let url = format!("{}/chat/completions", self.base);

        try_stream! {
            let headers = self.headers()?;
            let resp = self.http.post(url).headers(headers).json(&request).send().await?;

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                Err::<(), _>(OpenAiError::Api { status, body })?;
                return;
            }

            let mut bytes_stream = resp.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = bytes_stream.next().await {
                for frame in decoder.push(&chunk?)? {
                    match frame {
                        SseFrame::Done => return,
                        SseFrame::Data(data) => {
                            #[cfg(feature = "tracing")]
                            tracing::trace!(%data, "openai sse frame");

                            let parsed: ChatCompletionChunkResponse = serde_json::from_str(&data)?;
                            yield parsed;
                        }
                    }
                }
            }

            if decoder.has_pending() {
                Err::<(), _>(OpenAiError::Format("event stream closed mid-frame".into()))?;
            }
        }
    }
}

fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_on_every_constructor() {
        let http = HttpClient::new();

        let client = OpenAiClient::with_http("sk-test", http.clone(), Some("http://localhost:8080/v1/".into()));
        assert_eq!(client.base_url(), "http://localhost:8080/v1");

        let client = OpenAiClient::with_http("sk-test", http, None).with_base_url("http://proxy/v1//");
        assert_eq!(client.base_url(), "http://proxy/v1");
    }

    #[test]
    fn default_base_url_is_openai() {
        let client = OpenAiClient::with_http("sk-test", HttpClient::new(), None);
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
    }
}

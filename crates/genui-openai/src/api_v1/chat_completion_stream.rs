use serde::Deserialize;

use super::{
    chat_completion::{FinishReason, MessageRole},
    common::Usage,
};

/// Fragment of the `function_call` object streamed by the legacy
/// function-calling API. The name arrives once, the arguments in pieces.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct FunctionCallDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

/// A delta message as returned by OpenAI when `stream = true`.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ChatCompletionMessageDelta {
    #[serde(default)]
    pub role: Option<MessageRole>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub function_call: Option<FunctionCallDelta>,
}

/// A single streaming choice payload.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatCompletionChunkChoice {
    pub index: i64,
    #[serde(default)]
    pub delta: ChatCompletionMessageDelta,
    pub finish_reason: Option<FinishReason>,
}

/// The outermost object sent by OpenAI for each SSE chunk.
///
/// Only the fields the adapter reads are kept; `id`, `model` and the like are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunkResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChunkChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_function_call_chunk() {
        let chunk: ChatCompletionChunkResponse = serde_json::from_str(
            r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1,"model":"gpt-3.5-turbo",
                "choices":[{"index":0,"delta":{"role":"assistant","content":null,
                "function_call":{"name":"show_sandpack_editor","arguments":""}},"finish_reason":null}]}"#,
        )
        .unwrap();

        let choice = &chunk.choices[0];
        assert_eq!(choice.delta.role, Some(MessageRole::Assistant));
        assert_eq!(choice.delta.content, None);
        assert_eq!(
            choice.delta.function_call.as_ref().unwrap().name.as_deref(),
            Some("show_sandpack_editor")
        );
    }

    #[test]
    fn parses_finish_chunk_with_empty_delta_and_unknown_reason() {
        let chunk: ChatCompletionChunkResponse = serde_json::from_str(
            r#"{"object":"chat.completion.chunk","created":1,"model":"m",
                "choices":[{"index":0,"delta":{},"finish_reason":"something_new"}]}"#,
        )
        .unwrap();

        assert_eq!(chunk.choices[0].finish_reason, Some(FinishReason::Other));
        assert_eq!(chunk.choices[0].delta, ChatCompletionMessageDelta::default());
    }
}

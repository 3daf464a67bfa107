use std::pin::Pin;

use crate::OpenAiAdapter;
use crate::api_v1::{ChatCompletionChunkChoice, ChatCompletionRequest, FinishReason};
use crate::error::OpenAiError;
use futures_core::stream::Stream;
use genui_core::error::{GenuiError, Result};
use genui_core::generic::{GenericFunctionCall, GenericUsageReport, StreamEvent};
use genui_core::provider::{ChatCompleteParameters, StreamingEventsProvider};
use serde_json::Value;

impl StreamingEventsProvider for OpenAiAdapter {
    type EventStream<'s>
        = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send + 's>>
    where
        Self: 's;

    fn chat_complete_events_stream<'s>(
        &'s self,
        params: ChatCompleteParameters,
    ) -> Self::EventStream<'s> {
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            use futures_util::StreamExt;

            let request: ChatCompletionRequest = params.try_into()?;
            let mut assembler = FunctionCallAssembler::default();

            let stream = client.chat_completion_stream(request);
            futures_util::pin_mut!(stream);

            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(GenuiError::from)?;

                if let Some(usage) = chunk.usage {
                    yield StreamEvent::Usage(GenericUsageReport {
                        prompt_tokens: usage.prompt_tokens as i64,
                        completion_tokens: usage.completion_tokens as i64,
                        total_tokens: usage.total_tokens as i64,
                    });
                }

                // Only the first choice is rendered.
                for choice in chunk.choices.into_iter().filter(|choice| choice.index == 0) {
                    for event in assembler.consume(choice).map_err(GenuiError::from)? {
                        let terminal = event.is_terminal();
                        yield event;
                        if terminal {
                            return;
                        }
                    }
                }
            }
        })
    }
}

/// Turns streamed choices into [`StreamEvent`]s, buffering the argument
/// fragments of the (single) function call until the finish reason arrives.
#[derive(Debug, Default)]
struct FunctionCallAssembler {
    name: Option<String>,
    arguments: String,
}

impl FunctionCallAssembler {
    fn consume(&mut self, choice: ChatCompletionChunkChoice) -> std::result::Result<Vec<StreamEvent>, OpenAiError> {
        let mut events = Vec::new();
        let delta = choice.delta;

        if let Some(content) = delta.content.filter(|content| !content.is_empty()) {
            events.push(StreamEvent::TextDelta(content));
        }

        if let Some(function_call) = delta.function_call {
            if let Some(name) = function_call.name.filter(|name| !name.is_empty()) {
                if self.name.is_none() {
                    self.name = Some(name.clone());
                    events.push(StreamEvent::FunctionCallStart { name });
                }
            }

            if let Some(fragment) = function_call.arguments.filter(|fragment| !fragment.is_empty()) {
                self.arguments.push_str(&fragment);
                events.push(StreamEvent::FunctionCallArgumentsDelta(fragment));
            }
        }

        let Some(reason) = choice.finish_reason else {
            return Ok(events);
        };

        match (self.name.take(), reason) {
            (Some(name), _) => {
                let arguments = parse_arguments(std::mem::take(&mut self.arguments));
                events.push(StreamEvent::FunctionCall(GenericFunctionCall { name, arguments }));
            }
            (None, FinishReason::FunctionCall | FinishReason::ToolCalls) => {
                return Err(OpenAiError::Format(format!(
                    "finish reason {reason:?} without a function call"
                )));
            }
            (None, _) => events.push(StreamEvent::MessageEnd),
        }

        Ok(events)
    }
}

/// Arguments that aren't valid JSON are forwarded as a string, so schema
/// validation reports them together with the raw text.
fn parse_arguments(buffer: String) -> Value {
    if buffer.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(&buffer).unwrap_or(Value::String(buffer))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn choice(raw: &str) -> ChatCompletionChunkChoice {
        serde_json::from_str(raw).unwrap()
    }

    fn feed(assembler: &mut FunctionCallAssembler, raw: &[&str]) -> Vec<StreamEvent> {
        raw.iter()
            .flat_map(|raw| assembler.consume(choice(raw)).unwrap())
            .collect()
    }

    #[test]
    fn prose_chunks_become_text_deltas_then_message_end() {
        let mut assembler = FunctionCallAssembler::default();

        let events = feed(
            &mut assembler,
            &[
                r#"{"index":0,"delta":{"role":"assistant","content":""},"finish_reason":null}"#,
                r#"{"index":0,"delta":{"content":"Hel"},"finish_reason":null}"#,
                r#"{"index":0,"delta":{"content":"lo!"},"finish_reason":null}"#,
                r#"{"index":0,"delta":{},"finish_reason":"stop"}"#,
            ],
        );

        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta("Hel".into()),
                StreamEvent::TextDelta("lo!".into()),
                StreamEvent::MessageEnd,
            ]
        );
    }

    #[test]
    fn function_call_fragments_are_joined() {
        let mut assembler = FunctionCallAssembler::default();

        let events = feed(
            &mut assembler,
            &[
                r#"{"index":0,"delta":{"role":"assistant","content":null,"function_call":{"name":"show_sandpack_editor","arguments":""}},"finish_reason":null}"#,
                r#"{"index":0,"delta":{"function_call":{"arguments":"{\"code\":"}},"finish_reason":null}"#,
                r#"{"index":0,"delta":{"function_call":{"arguments":"\"const x=1;\"}"}},"finish_reason":null}"#,
                r#"{"index":0,"delta":{},"finish_reason":"function_call"}"#,
            ],
        );

        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            StreamEvent::FunctionCallStart {
                name: "show_sandpack_editor".into()
            }
        );
        assert_eq!(
            events[3],
            StreamEvent::FunctionCall(GenericFunctionCall {
                name: "show_sandpack_editor".into(),
                arguments: json!({ "code": "const x=1;" }),
            })
        );
    }

    #[test]
    fn malformed_arguments_are_forwarded_as_string() {
        let mut assembler = FunctionCallAssembler::default();

        let events = feed(
            &mut assembler,
            &[
                r#"{"index":0,"delta":{"function_call":{"name":"show_sandpack_editor","arguments":"{'code': 1"}},"finish_reason":null}"#,
                r#"{"index":0,"delta":{},"finish_reason":"function_call"}"#,
            ],
        );

        assert_eq!(
            events.last(),
            Some(&StreamEvent::FunctionCall(GenericFunctionCall {
                name: "show_sandpack_editor".into(),
                arguments: Value::String("{'code': 1".into()),
            }))
        );
    }

    #[test]
    fn function_call_finish_without_name_is_a_format_error() {
        let mut assembler = FunctionCallAssembler::default();

        let err = assembler
            .consume(choice(r#"{"index":0,"delta":{},"finish_reason":"function_call"}"#))
            .unwrap_err();

        assert!(matches!(err, OpenAiError::Format(_)));
    }

    #[test]
    fn empty_arguments_decode_to_empty_object() {
        assert_eq!(parse_arguments("  ".into()), json!({}));
    }
}

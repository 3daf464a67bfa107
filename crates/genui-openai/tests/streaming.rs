use std::sync::Mutex;

use futures_util::StreamExt;
use genui_core::{
    DispatchOptions, DispatchOutcome, Dispatcher, FunctionDefinition, FunctionRegistry,
    error::GenuiError,
    generic::{ConversationTurn, GenericUsageReport, StreamEvent},
    provider::{ChatCompleteParameters, StreamingEventsProvider},
};
use genui_openai::{OpenAiAdapter, OpenAiAdapterBuilder, error::OpenAiError};
use mockito::{Mock, Server, ServerGuard};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
struct EditorArgs {
    /// The code to be displayed in Sandpack.
    code: String,
}

struct ShowSandpackEditor;

impl FunctionDefinition for ShowSandpackEditor {
    type Arguments = EditorArgs;
    const NAME: &'static str = "show_sandpack_editor";
    const DESCRIPTION: &'static str = "Show the code editor and preview using Sandpack.";
}

fn registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    registry.register_function::<ShowSandpackEditor>().unwrap();
    registry
}

fn adapter(server: &ServerGuard) -> OpenAiAdapter {
    OpenAiAdapterBuilder::new()
        .with_api_key("sk-test")
        .with_base_url(format!("{}/v1/", server.url()))
        .build()
        .unwrap()
}

/// One SSE frame per chunk JSON.
fn sse(chunks: &[&str]) -> String {
    chunks.iter().map(|chunk| format!("data: {chunk}\n\n")).collect()
}

async fn mock_stream(server: &mut ServerGuard, body: String) -> Mock {
    server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_header("accept", "text/event-stream")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await
}

#[derive(Default)]
struct Recorded {
    texts: Mutex<Vec<(String, bool)>>,
    calls: Mutex<Vec<EditorArgs>>,
}

async fn run_turn(adapter: OpenAiAdapter, recorded: &Recorded) -> genui_core::error::Result<DispatchOutcome> {
    let dispatcher = Dispatcher::new(adapter);
    let registry = registry();

    dispatcher
        .dispatch(
            vec![ConversationTurn::user("Show me a button")],
            "You are a code assistant.",
            &registry,
            DispatchOptions::default(),
        )
        .on_text(|text, is_final| recorded.texts.lock().unwrap().push((text.to_string(), is_final)))
        .on_function_call::<ShowSandpackEditor>(|args| recorded.calls.lock().unwrap().push(args))
        .run()
        .await
}

fn texts(recorded: &Recorded) -> Vec<(String, bool)> {
    recorded.texts.lock().unwrap().clone()
}

fn owned(pairs: &[(&str, bool)]) -> Vec<(String, bool)> {
    pairs.iter().map(|(text, done)| (text.to_string(), *done)).collect()
}

#[tokio::test]
async fn prose_stream_reaches_text_subscriber() {
    let mut server = Server::new_async().await;
    let mut body = sse(&[
        r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":""},"finish_reason":null}]}"#,
        r#"{"choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#,
        r#"{"choices":[{"index":0,"delta":{"content":"lo!"},"finish_reason":null}]}"#,
        r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
    ]);
    body.push_str("data: [DONE]\n\n");
    let mock = mock_stream(&mut server, body).await;

    let recorded = Recorded::default();
    let outcome = run_turn(adapter(&server), &recorded).await.unwrap();

    mock.assert_async().await;
    assert_eq!(outcome, DispatchOutcome::Text("Hello!".into()));
    assert_eq!(
        texts(&recorded),
        owned(&[("Hel", false), ("Hello!", false), ("Hello!", true)])
    );
    assert!(recorded.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fragmented_function_call_is_decoded() {
    let mut server = Server::new_async().await;
    let body = sse(&[
        r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":null,"function_call":{"name":"show_sandpack_editor","arguments":""}},"finish_reason":null}]}"#,
        r#"{"choices":[{"index":0,"delta":{"function_call":{"arguments":"{\"co"}},"finish_reason":null}]}"#,
        r#"{"choices":[{"index":0,"delta":{"function_call":{"arguments":"de\":\"const x=1;\"}"}},"finish_reason":null}]}"#,
        r#"{"choices":[{"index":0,"delta":{},"finish_reason":"function_call"}]}"#,
    ]);
    let mock = mock_stream(&mut server, body).await;

    let recorded = Recorded::default();
    let outcome = run_turn(adapter(&server), &recorded).await.unwrap();

    mock.assert_async().await;
    assert_eq!(
        outcome,
        DispatchOutcome::FunctionCall {
            name: "show_sandpack_editor".into(),
            delivered: true
        }
    );
    assert_eq!(
        *recorded.calls.lock().unwrap(),
        vec![EditorArgs {
            code: "const x=1;".into()
        }]
    );
    assert!(texts(&recorded).is_empty());
}

#[tokio::test]
async fn error_status_surfaces_as_transport_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let recorded = Recorded::default();
    let err = run_turn(adapter(&server), &recorded).await.unwrap_err();

    mock.assert_async().await;
    let GenuiError::Transport(source) = &err else {
        panic!("expected a transport error, got {err:?}");
    };
    match source.downcast_ref::<OpenAiError>() {
        Some(OpenAiError::Api { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
    assert!(texts(&recorded).is_empty());
}

#[tokio::test]
async fn stream_closed_without_finish_is_a_transport_error() {
    let mut server = Server::new_async().await;
    let body = sse(&[r#"{"choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#]);
    let _mock = mock_stream(&mut server, body).await;

    let recorded = Recorded::default();
    let err = run_turn(adapter(&server), &recorded).await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(texts(&recorded), owned(&[("Hel", false)]));
}

#[tokio::test]
async fn stream_closed_mid_frame_is_a_format_error() {
    let mut server = Server::new_async().await;
    let mut body = sse(&[r#"{"choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#]);
    body.push_str(r#"data: {"choices":[{"index":0,"delta":{"cont"#);
    let _mock = mock_stream(&mut server, body).await;

    let recorded = Recorded::default();
    let err = run_turn(adapter(&server), &recorded).await.unwrap_err();

    let GenuiError::Transport(source) = &err else {
        panic!("expected a transport error, got {err:?}");
    };
    assert!(matches!(source.downcast_ref::<OpenAiError>(), Some(OpenAiError::Format(_))));
    assert_eq!(texts(&recorded), owned(&[("Hel", false)]));
}

#[tokio::test]
async fn event_stream_forwards_usage_and_stops_at_first_terminal_event() {
    let mut server = Server::new_async().await;
    let body = sse(&[
        r#"{"choices":[{"index":1,"delta":{"content":"other choice"},"finish_reason":null}]}"#,
        r#"{"choices":[{"index":0,"delta":{"content":"Hi"},"finish_reason":null}]}"#,
        r#"{"choices":[],"usage":{"prompt_tokens":12,"completion_tokens":1,"total_tokens":13}}"#,
        r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
        r#"{"choices":[{"index":0,"delta":{"content":"after the end"},"finish_reason":null}]}"#,
    ]);
    let _mock = mock_stream(&mut server, body).await;

    let adapter = adapter(&server);
    let params = ChatCompleteParameters::new(
        vec![ConversationTurn::user("Hi")],
        Default::default(),
    );
    let events: Vec<StreamEvent> = adapter
        .chat_complete_events_stream(params)
        .map(|event| event.unwrap())
        .collect()
        .await;

    assert_eq!(
        events,
        vec![
            StreamEvent::TextDelta("Hi".into()),
            StreamEvent::Usage(GenericUsageReport {
                prompt_tokens: 12,
                completion_tokens: 1,
                total_tokens: 13,
            }),
            StreamEvent::MessageEnd,
        ]
    );
}

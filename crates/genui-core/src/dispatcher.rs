//! The streaming completion dispatcher.
//!
//! One [`Dispatcher::dispatch`] call covers exactly one new turn: it builds
//! the request (system prompt + history + advertised functions), and returns
//! a [`StreamHandle`] the caller subscribes to before running it. While the
//! handle runs, the token stream is classified as either prose or a single
//! function call:
//!
//! * prose tokens are accumulated and every accumulated prefix is handed to
//!   the text subscriber, followed by one final call carrying the full text;
//! * as soon as the accumulated text starts with `{`, or the provider signals
//!   a function call, text delivery stops for the rest of the turn;
//! * a completed function call is looked up in the registry, validated, and
//!   handed to the subscriber registered for its name.
//!
//! The dispatcher never touches the conversation history. The returned
//! [`DispatchOutcome`] tells the caller which turn to record.
//!
//! ```rust,no_run
//! # use genui_core::{dispatcher::*, registry::FunctionRegistry, provider::StreamingEventsProvider};
//! # async fn demo<P: StreamingEventsProvider>(dispatcher: Dispatcher<P>, registry: FunctionRegistry)
//! # -> genui_core::error::Result<()> {
//! use genui_core::generic::ConversationTurn;
//!
//! let history = vec![ConversationTurn::user("Show me a counter component")];
//! let outcome = dispatcher
//!     .dispatch(history, "You are a code assistant.", &registry, DispatchOptions::default())
//!     .on_text(|text, is_final| println!("{is_final}: {text}"))
//!     .on_function_call_json("show_sandpack_editor", |args| println!("{args}"))
//!     .run()
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Dropping a handle stops polling the provider stream. Whether the
//! underlying request is aborted is up to the provider.
use std::{collections::HashMap, fmt, pin::Pin, sync::Arc};

use futures_core::stream::Stream;
use futures_util::StreamExt;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    error::{GenuiError, Result},
    function::FunctionDefinition,
    generic::{ConversationTurn, GenericFunctionCall, StreamEvent},
    model::Model,
    provider::{ChatCompleteParameters, StreamingEventsProvider},
    registry::{DecodedCall, FunctionRegistry},
};

/// Boxed provider stream consumed by a [`StreamHandle`].
pub type EventStream<'a> = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send + 'a>>;

type TextCallback<'a> = Box<dyn FnMut(&str, bool) + Send + 'a>;
type FunctionCallback<'a> = Box<dyn FnOnce(DecodedCall) -> Result<()> + Send + 'a>;

/// Per-request settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOptions {
    pub model: Model,
    /// Sampling temperature. Defaults to `0`: the model has to reliably pick
    /// the intended function instead of narrating code in prose.
    pub temperature: f64,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: 0.0,
        }
    }
}

impl DispatchOptions {
    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// How a dispatched turn resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Prose. The final text callback fired with this text.
    Text(String),
    /// A registered function was called with valid arguments. `delivered` is
    /// `false` when nobody subscribed to `name`.
    FunctionCall { name: String, delivered: bool },
    /// The model asked for a function the registry doesn't have. The call was
    /// dropped and no callback fired.
    UnknownFunction { name: String },
    /// The text started with `{` (or a call was announced) but the stream
    /// ended without a function call. No text callback fired.
    Suppressed { text: String },
}

/// Drives one provider stream on behalf of one backend.
///
/// Clone it to share across tasks; the backend sits behind an `Arc`.
pub struct Dispatcher<P> {
    provider: Arc<P>,
}

impl<P> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P> fmt::Debug for Dispatcher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl<P> Dispatcher<P>
where
    P: StreamingEventsProvider,
{
    pub fn new(provider: P) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    pub fn from_shared(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Access the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Prepare a completion request for one new turn.
    ///
    /// `history` must already contain the new user turn; `system_prompt` is
    /// sent as a leading system turn. Nothing is sent until
    /// [`StreamHandle::run`] is awaited.
    pub fn dispatch<'a>(
        &'a self,
        history: impl IntoIterator<Item = ConversationTurn>,
        system_prompt: &str,
        registry: &'a FunctionRegistry,
        options: DispatchOptions,
    ) -> StreamHandle<'a> {
        let mut messages = vec![ConversationTurn::system(system_prompt)];
        messages.extend(history);

        debug!(
            model = ?options.model,
            turns = messages.len(),
            functions = registry.len(),
            "dispatching completion request"
        );

        let params = ChatCompleteParameters::new(messages, options.model)
            .with_functions(registry.describe_all())
            .with_temperature(options.temperature);

        StreamHandle::new(
            Box::pin(self.provider.chat_complete_events_stream(params)),
            registry,
        )
    }
}

/// Mutable state of one running dispatch.
#[derive(Debug, Default)]
struct StreamSession {
    accumulated_text: String,
    function_invoked: bool,
}

/// Subscription surface of one dispatch.
///
/// Attach subscribers with [`Self::on_text`], [`Self::on_function_call`] and
/// [`Self::on_function_call_json`], then consume it with [`Self::run`].
/// Subscribing twice to the same event replaces the earlier subscriber.
#[must_use = "nothing is sent until the handle is run"]
pub struct StreamHandle<'a> {
    events: EventStream<'a>,
    registry: &'a FunctionRegistry,
    on_text: Option<TextCallback<'a>>,
    on_function_call: HashMap<String, FunctionCallback<'a>>,
}

impl<'a> StreamHandle<'a> {
    /// Wrap an already prepared event stream. [`Dispatcher::dispatch`] is the
    /// usual way to get a handle.
    pub fn new(events: EventStream<'a>, registry: &'a FunctionRegistry) -> Self {
        Self {
            events,
            registry,
            on_text: None,
            on_function_call: HashMap::new(),
        }
    }

    /// Called with `(accumulated_text, false)` for every prose token, then
    /// once with `(full_text, true)` when the provider signals completion.
    /// Once the turn turns out to be a function call, it isn't called again.
    pub fn on_text(mut self, callback: impl FnMut(&str, bool) + Send + 'a) -> Self {
        self.on_text = Some(Box::new(callback));
        self
    }

    /// Called at most once with the decoded arguments if the turn resolves to
    /// a call of `F`.
    pub fn on_function_call<F: FunctionDefinition>(
        mut self,
        callback: impl FnOnce(F::Arguments) + Send + 'a,
    ) -> Self {
        self.on_function_call.insert(
            F::NAME.to_string(),
            Box::new(move |call: DecodedCall| {
                callback(call.downcast::<F::Arguments>()?);
                Ok(())
            }),
        );
        self
    }

    /// Like [`Self::on_function_call`] but hands over the validated arguments
    /// as JSON.
    pub fn on_function_call_json(
        mut self,
        name: impl Into<String>,
        callback: impl FnOnce(Value) + Send + 'a,
    ) -> Self {
        self.on_function_call.insert(
            name.into(),
            Box::new(move |call: DecodedCall| {
                callback(call.raw_arguments().clone());
                Ok(())
            }),
        );
        self
    }

    /// Consume the provider stream until its terminal event.
    ///
    /// # Errors
    ///
    /// * [`GenuiError::Transport`] – the stream failed or ended without a
    ///   terminal event. No final text callback fires.
    /// * [`GenuiError::ArgumentValidation`] – the function call's arguments
    ///   don't match the registered schema. No callback fires.
    pub async fn run(mut self) -> Result<DispatchOutcome> {
        let mut session = StreamSession::default();

        while let Some(event) = self.events.next().await {
            match event? {
                StreamEvent::TextDelta(token) => self.consume_token(&mut session, &token),
                StreamEvent::FunctionCallStart { name } => {
                    trace!(%name, "function call started");
                    session.function_invoked = true;
                }
                StreamEvent::FunctionCallArgumentsDelta(fragment) => {
                    trace!(%fragment, "function call arguments");
                    session.function_invoked = true;
                }
                StreamEvent::Usage(usage) => {
                    debug!(
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        total_tokens = usage.total_tokens,
                        "usage reported"
                    );
                }
                StreamEvent::FunctionCall(call) => return self.deliver_function_call(call),
                StreamEvent::MessageEnd => return Ok(self.finish(session)),
            }
        }

        Err(GenuiError::transport(
            "provider stream ended before a completion signal",
        ))
    }

    fn consume_token(&mut self, session: &mut StreamSession, token: &str) {
        if token.is_empty() {
            return;
        }
        session.accumulated_text.push_str(token);

        if session.function_invoked {
            return;
        }
        // Function-call payloads are brace-led JSON; prose never is.
        if session.accumulated_text.starts_with('{') {
            debug!("brace-led response, treating the turn as a function call");
            session.function_invoked = true;
            return;
        }

        if let Some(on_text) = self.on_text.as_mut() {
            on_text(&session.accumulated_text, false);
        }
    }

    fn deliver_function_call(mut self, call: GenericFunctionCall) -> Result<DispatchOutcome> {
        let GenericFunctionCall { name, arguments } = call;

        if !self.registry.contains(&name) {
            warn!(%name, "model requested an unregistered function, dropping the call");
            return Ok(DispatchOutcome::UnknownFunction { name });
        }

        let decoded = self.registry.validate(&name, &arguments)?;

        let delivered = match self.on_function_call.remove(&name) {
            Some(callback) => {
                callback(decoded)?;
                true
            }
            None => {
                debug!(%name, "no subscriber for function call");
                false
            }
        };

        Ok(DispatchOutcome::FunctionCall { name, delivered })
    }

    fn finish(mut self, session: StreamSession) -> DispatchOutcome {
        let StreamSession {
            accumulated_text: text,
            function_invoked,
        } = session;

        if function_invoked {
            warn!(%text, "stream ended without a function call, suppressing brace-led text");
            return DispatchOutcome::Suppressed { text };
        }

        if let Some(on_text) = self.on_text.as_mut() {
            on_text(&text, true);
        }
        DispatchOutcome::Text(text)
    }
}

impl fmt::Debug for StreamHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("has_text_subscriber", &self.on_text.is_some())
            .field(
                "function_subscribers",
                &self.on_function_call.keys().collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

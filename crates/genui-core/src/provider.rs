//! The seam between the dispatcher and a concrete completion provider.
use futures_core::stream::Stream;

use crate::{
    error::Result,
    generic::{ConversationTurn, GenericFunctionSpec, StreamEvent},
    model::Model,
};

/// A **provider** turns chat parameters into a network call to a concrete
/// backend (OpenAI, a local server, a test script …) and yields the answer
/// as a stream of [`StreamEvent`]s.
///
/// The stream must be lazy: no request is sent before it is first polled.
/// The dispatcher relies on that to have every subscription in place before
/// the first token can arrive.
///
/// Transport failures are reported as `Err` items carrying
/// [`crate::error::GenuiError::Transport`]. A well-behaved stream ends with
/// exactly one terminal event ([`StreamEvent::MessageEnd`] or
/// [`StreamEvent::FunctionCall`]).
pub trait StreamingEventsProvider: Send + Sync {
    type EventStream<'s>: Stream<Item = Result<StreamEvent>> + Send + 's
    where
        Self: 's;

    /// Start a streaming chat completion.
    fn chat_complete_events_stream<'s>(
        &'s self,
        params: ChatCompleteParameters,
    ) -> Self::EventStream<'s>;
}

#[derive(Debug, Clone)]
pub struct ChatCompleteParameters {
    pub messages: Vec<ConversationTurn>,
    pub model: Model,
    pub functions: Option<Vec<GenericFunctionSpec>>,
    pub temperature: Option<f64>,
}

impl ChatCompleteParameters {
    pub fn new(messages: Vec<ConversationTurn>, model: Model) -> Self {
        Self {
            messages,
            model,
            functions: None,
            temperature: None,
        }
    }

    pub fn messages(&self) -> &[ConversationTurn] {
        &self.messages
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn functions(&self) -> Option<&Vec<GenericFunctionSpec>> {
        self.functions.as_ref()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Advertise `functions`; an empty list is sent as no functions at all.
    pub fn with_functions(mut self, functions: Vec<GenericFunctionSpec>) -> Self {
        self.functions = (!functions.is_empty()).then_some(functions);
        self
    }
}

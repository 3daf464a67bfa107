//! One conversation between a user, the model and a presentation bridge.
use std::sync::Arc;

use genui_core::{
    dispatcher::{DispatchOutcome, Dispatcher},
    error::{GenuiError, Result},
    function::FunctionDefinition,
    generic::ConversationTurn,
    history::HistoryStore,
    provider::StreamingEventsProvider,
    registry::FunctionRegistry,
};
use serde_json::json;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::{bridge::PresentationBridge, config::SessionConfig, sandpack::ShowSandpackEditor};

/// Owns the history of one conversation and drives a [`Dispatcher`] for every
/// user message.
///
/// Background work started by [`Self::show_sandpack_editor`] runs on the
/// tokio runtime. It is collected before the next message is dispatched and
/// aborted when the session is dropped.
pub struct ChatSession<P> {
    dispatcher: Dispatcher<P>,
    registry: Arc<FunctionRegistry>,
    history: HistoryStore,
    config: SessionConfig,
    background: JoinSet<Result<ConversationTurn>>,
}

impl<P> std::fmt::Debug for ChatSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("turns", &self.history.len())
            .field("functions", &self.registry.len())
            .field("config", &self.config)
            .field("background", &self.background.len())
            .finish()
    }
}

impl<P> ChatSession<P>
where
    P: StreamingEventsProvider,
{
    pub fn new(dispatcher: Dispatcher<P>, registry: Arc<FunctionRegistry>, config: SessionConfig) -> Self {
        Self {
            dispatcher,
            registry,
            history: HistoryStore::new(),
            config,
            background: JoinSet::new(),
        }
    }

    /// Resume a conversation from earlier turns.
    pub fn with_history(mut self, history: HistoryStore) -> Self {
        self.history = history;
        self
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Number of background tasks not yet collected.
    pub fn pending_background(&self) -> usize {
        self.background.len()
    }

    /// Record `content` as a user turn and stream the model's answer to
    /// `bridge`.
    ///
    /// Prose arrives through [`PresentationBridge::text_update`]; a call of
    /// any registered function through
    /// [`PresentationBridge::function_call_result`]. On success the answer is
    /// recorded: the final text as an assistant turn, a function call as a
    /// function turn carrying its acknowledgement. Unknown functions and
    /// suppressed JSON-looking prose leave only the user turn behind.
    ///
    /// # Errors
    ///
    /// Whatever [`genui_core::StreamHandle::run`] reports, or a failed
    /// background task collected before dispatching. The user turn stays in
    /// the history either way.
    pub async fn submit_user_message<B>(&mut self, content: &str, bridge: &B) -> Result<DispatchOutcome>
    where
        B: PresentationBridge + ?Sized,
    {
        self.join_background().await?;

        self.history.append(ConversationTurn::user(format!(
            "{content}{}",
            self.config.user_message_suffix
        )));
        debug!(turns = self.history.len(), "submitting user message");

        let mut handle = self
            .dispatcher
            .dispatch(
                self.history.snapshot(),
                &self.config.system_prompt,
                &self.registry,
                self.config.dispatch_options(),
            )
            .on_text(|text, is_final| bridge.text_update(text, is_final));

        for name in self.registry.names() {
            let owned = name.to_string();
            handle = handle.on_function_call_json(name, move |arguments| {
                bridge.function_call_result(&owned, &arguments)
            });
        }

        let outcome = handle.run().await;

        match &outcome {
            Ok(DispatchOutcome::Text(text)) => {
                self.history.append(ConversationTurn::assistant(text.clone()));
            }
            Ok(DispatchOutcome::FunctionCall { name, .. }) => {
                let acknowledgement = self
                    .registry
                    .get(name)
                    .map(|schema| schema.acknowledgement().to_string())
                    .unwrap_or_default();
                self.history
                    .append(ConversationTurn::function(name.clone(), acknowledgement));
            }
            Ok(DispatchOutcome::UnknownFunction { .. } | DispatchOutcome::Suppressed { .. }) => {}
            Err(err) => warn!(error = %err, "dispatch failed"),
        }

        outcome
    }

    /// Show `code` in the Sandpack editor after the configured delay.
    ///
    /// Returns immediately. Once the delay has passed the bridge receives a
    /// `show_sandpack_editor` result and a system turn acknowledging it is
    /// queued for the history; it lands there on the next
    /// [`Self::join_background`] or [`Self::submit_user_message`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn show_sandpack_editor<B>(&mut self, code: impl Into<String>, bridge: Arc<B>)
    where
        B: PresentationBridge + ?Sized + 'static,
    {
        let arguments = json!({ "code": code.into() });
        let delay = self.config.editor_delay;

        self.background.spawn(async move {
            tokio::time::sleep(delay).await;
            bridge.function_call_result(ShowSandpackEditor::NAME, &arguments);
            Ok(ConversationTurn::system(ShowSandpackEditor::ACKNOWLEDGEMENT))
        });
    }

    /// Wait for all background tasks and append their turns in completion
    /// order.
    ///
    /// # Errors
    ///
    /// [`GenuiError::TaskFailed`] if a task panicked or was cancelled, or the
    /// task's own error. Tasks still pending stay queued.
    pub async fn join_background(&mut self) -> Result<()> {
        while let Some(joined) = self.background.join_next().await {
            let turn = joined.map_err(|err| GenuiError::TaskFailed(err.to_string()))??;
            self.history.append(turn);
        }
        Ok(())
    }
}

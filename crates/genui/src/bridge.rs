//! Sink side of a session: whatever renders the conversation.
//!
//! A bridge receives two kinds of events and returns nothing:
//!
//! * text updates while the model writes prose (`is_final` once at the end),
//! * function-call results carrying the validated arguments.
//!
//! Implementations take `&self` because a session hands the same bridge to
//! several subscribers at once; use interior mutability or a channel.
//! [`tokio::sync::mpsc::UnboundedSender<BridgeEvent>`] is a bridge out of the
//! box, convenient for forwarding events to a transport task.
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

pub trait PresentationBridge: Send + Sync {
    fn text_update(&self, text: &str, is_final: bool);

    fn function_call_result(&self, name: &str, arguments: &Value);
}

/// Owned form of the two bridge events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    TextUpdate { text: String, is_final: bool },
    FunctionCallResult { name: String, arguments: Value },
}

impl BridgeEvent {
    /// Hand the event to `bridge`.
    pub fn deliver<B: PresentationBridge + ?Sized>(&self, bridge: &B) {
        match self {
            BridgeEvent::TextUpdate { text, is_final } => bridge.text_update(text, *is_final),
            BridgeEvent::FunctionCallResult { name, arguments } => {
                bridge.function_call_result(name, arguments)
            }
        }
    }
}

/// Events sent after the receiver is gone are dropped.
impl PresentationBridge for UnboundedSender<BridgeEvent> {
    fn text_update(&self, text: &str, is_final: bool) {
        let _ = self.send(BridgeEvent::TextUpdate {
            text: text.to_string(),
            is_final,
        });
    }

    fn function_call_result(&self, name: &str, arguments: &Value) {
        let _ = self.send(BridgeEvent::FunctionCallResult {
            name: name.to_string(),
            arguments: arguments.clone(),
        });
    }
}

impl<B: PresentationBridge + ?Sized> PresentationBridge for Arc<B> {
    fn text_update(&self, text: &str, is_final: bool) {
        (**self).text_update(text, is_final)
    }

    fn function_call_result(&self, name: &str, arguments: &Value) {
        (**self).function_call_result(name, arguments)
    }
}

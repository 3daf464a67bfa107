//! Generic conversation and stream types used by the *genui-core* crate.
//!
//! They mirror the concepts exposed by most completion APIs: “system”,
//! “user”, “assistant” and “function” turns, function specs advertised to the
//! model, and the incremental events a streaming response is made of. Provider
//! crates convert them into their wire structs via `From`/`Into`.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One entry in the conversation history.
///
/// * `content` – the raw UTF-8 payload. For a function-result turn this is a
///   short acknowledgement, not the raw output of the operation.
/// * `name` – set only for [`Role::Function`] turns.
/// * `id` – optional correlation identifier assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ConversationTurn {
    /// ```rust
    /// use genui_core::generic::{ConversationTurn, Role};
    ///
    /// let turn = ConversationTurn::new("Build me a counter".into(), Role::User);
    /// assert_eq!(turn.role, Role::User);
    /// ```
    pub fn new(content: String, role: Role) -> Self {
        Self {
            role,
            content,
            name: None,
            id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content.into(), Role::User)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content.into(), Role::Assistant)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(content.into(), Role::System)
    }

    /// A function-result turn produced by the operation `name`.
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Function,
            content: content.into(),
            name: Some(name.into()),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

/// Conversation roles. Mutually exclusive; a turn has exactly one.
///
/// The `Display` implementation renders the canonical lowercase name.
#[derive(Debug, Clone, Serialize, Deserialize, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Global behaviour and style guidelines.
    System,
    /// Produced by the model.
    Assistant,
    /// Originating from the human user.
    User,
    /// Result of a function call the model requested.
    Function,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::Assistant => write!(f, "assistant"),
            Role::User => write!(f, "user"),
            Role::Function => write!(f, "function"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericUsageReport {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

/// A function call as requested by the model, arguments not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericFunctionCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Provider-facing description of a callable operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericFunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Plain text token emitted by the assistant.
    TextDelta(String),

    /// The model started a function call.
    FunctionCallStart { name: String },

    /// A partial arguments JSON fragment of the pending function call.
    FunctionCallArgumentsDelta(String),

    /// The completed function call. Terminates the turn.
    FunctionCall(GenericFunctionCall),

    /// The assistant finished the message. Terminates the turn.
    MessageEnd,

    /// Optional token usage report.
    Usage(GenericUsageReport),
}

impl StreamEvent {
    /// `true` for events after which the provider sends nothing else for
    /// this turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::FunctionCall(_) | StreamEvent::MessageEnd)
    }
}

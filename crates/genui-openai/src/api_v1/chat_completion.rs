use genui_core::error::GenuiError;
use genui_core::generic::{ConversationTurn, GenericFunctionSpec, Role};
use genui_core::provider::ChatCompleteParameters;
use serde::{Deserialize, Serialize};

use crate::impl_builder_methods;
use crate::model_map::map_model;

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    pub fn new(model: String, messages: Vec<ChatCompletionMessage>) -> Self {
        Self {
            model,
            messages,
            functions: None,
            temperature: None,
            stream: None,
        }
    }
}

impl_builder_methods!(
    ChatCompletionRequest,
    functions: Vec<FunctionSpec>,
    temperature: f64,
    stream: bool
);

impl TryFrom<ChatCompleteParameters> for ChatCompletionRequest {
    type Error = GenuiError;

    fn try_from(value: ChatCompleteParameters) -> Result<Self, Self::Error> {
        let model = map_model(&value.model).ok_or_else(|| GenuiError::ModelNotSupported {
            provider: "openai",
            model: format!("{:?}", value.model),
        })?;

        Ok(Self {
            model: model.into_owned(),
            messages: value.messages.into_iter().map(Into::into).collect(),
            functions: value
                .functions
                .map(|functions| functions.into_iter().map(Into::into).collect()),
            temperature: value.temperature,
            stream: None,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<GenericFunctionSpec> for FunctionSpec {
    fn from(value: GenericFunctionSpec) -> Self {
        FunctionSpec {
            name: value.name,
            description: value.description,
            parameters: value.parameters,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    System,
    Assistant,
    Function,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChatCompletionMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    FunctionCall,
    ToolCalls,
    #[serde(other)]
    Other,
}

impl From<Role> for MessageRole {
    fn from(value: Role) -> Self {
        match value {
            Role::System => MessageRole::System,
            Role::Assistant => MessageRole::Assistant,
            Role::User => MessageRole::User,
            Role::Function => MessageRole::Function,
        }
    }
}

impl From<ConversationTurn> for ChatCompletionMessage {
    fn from(value: ConversationTurn) -> Self {
        // OpenAI only accepts `name` on function messages here.
        let name = match value.role {
            Role::Function => value.name,
            _ => None,
        };

        Self {
            role: value.role.into(),
            content: value.content,
            name,
        }
    }
}

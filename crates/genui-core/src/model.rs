//! Model identifiers used throughout the **genui** workspace.
//!
//! Pick an enum variant instead of typing literal strings such as
//! `"gpt-3.5-turbo"`; each provider crate maps the variants onto its own
//! naming scheme.
//!
//! # Adding more models
//!
//! 1. Add the variant to the provider sub-enum (`OpenAiModel`).
//! 2. Update the mapping function in the provider crate
//!    (`genui-openai::model_map::map_model`).
//!
//! # Example
//!
//! ```rust
//! use genui_core::model::{Model, OpenAiModel};
//! assert_eq!(Model::from(OpenAiModel::Gpt4oMini),
//!            Model::OpenAi(OpenAiModel::Gpt4oMini));
//! ```
use std::borrow::Cow;

/// Universal identifier for an LLM model.
///
/// * `OpenAi` – models with a dedicated variant.
/// * `Custom` – any model name not covered by an enum, passed through as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    OpenAi(OpenAiModel),
    Custom(Cow<'static, str>),
}

impl Model {
    /// Wrap an arbitrary model name, e.g. one read from the environment.
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        Model::Custom(name.into())
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::OpenAi(OpenAiModel::Gpt35Turbo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenAiModel {
    Gpt35Turbo,
    Gpt4o,
    Gpt4oMini,
    Gpt41,
    Gpt41Mini,
}

impl From<OpenAiModel> for Model {
    fn from(val: OpenAiModel) -> Self {
        Model::OpenAi(val)
    }
}

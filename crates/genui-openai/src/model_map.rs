use std::borrow::Cow;

use genui_core::model::{Model, OpenAiModel};

pub const GPT3_5_TURBO: &str = "gpt-3.5-turbo";
pub const GPT4_O: &str = "gpt-4o";
pub const GPT4_O_MINI: &str = "gpt-4o-mini";
pub const GPT4_1: &str = "gpt-4.1";
pub const GPT4_1_MINI: &str = "gpt-4.1-mini";

/// Wire name of `model`. Custom names pass through unchanged.
pub fn map_model(model: &Model) -> Option<Cow<'static, str>> {
    let openai_model = match model {
        Model::Custom(custom) if custom.trim().is_empty() => return None,
        Model::Custom(custom) => return Some(custom.clone()),
        Model::OpenAi(openai_model) => openai_model,
    };

    Some(
        match openai_model {
            OpenAiModel::Gpt35Turbo => GPT3_5_TURBO,
            OpenAiModel::Gpt4o => GPT4_O,
            OpenAiModel::Gpt4oMini => GPT4_O_MINI,
            OpenAiModel::Gpt41 => GPT4_1,
            OpenAiModel::Gpt41Mini => GPT4_1_MINI,
        }
        .into(),
    )
}

//! Session settings.
//!
//! Defaults match the Sandpack assistant: `gpt-3.5-turbo`, temperature 0, the
//! Sandpack system prompt, the JSON warning appended to user messages and a
//! one second editor delay. [`SessionConfig::from_env`] lets deployments
//! override the model and the delay:
//!
//! | Variable                 | Effect                                  |
//! |--------------------------|-----------------------------------------|
//! | `GENUI_MODEL`            | model name passed through to the backend |
//! | `GENUI_EDITOR_DELAY_MS`  | delay before the editor shows up        |
use std::{env, time::Duration};

use genui_core::{
    dispatcher::DispatchOptions,
    error::{GenuiError, Result},
    model::Model,
};

use crate::sandpack::{JSON_WARNING_SUFFIX, SYSTEM_MESSAGE};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub model: Model,
    pub system_prompt: String,
    /// Appended verbatim to every submitted user message.
    pub user_message_suffix: String,
    pub editor_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            system_prompt: SYSTEM_MESSAGE.to_string(),
            user_message_suffix: JSON_WARNING_SUFFIX.to_string(),
            editor_delay: Duration::from_secs(1),
        }
    }
}

impl SessionConfig {
    /// Defaults, overridden by `GENUI_MODEL` and `GENUI_EDITOR_DELAY_MS`.
    ///
    /// # Errors
    ///
    /// [`GenuiError::Invalid`] if `GENUI_EDITOR_DELAY_MS` isn't a number.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(model) = env::var("GENUI_MODEL").ok().filter(|m| !m.trim().is_empty()) {
            config.model = Model::custom(model);
        }

        if let Ok(delay) = env::var("GENUI_EDITOR_DELAY_MS") {
            let millis = delay.trim().parse::<u64>().map_err(|e| {
                GenuiError::Invalid(format!("GENUI_EDITOR_DELAY_MS `{delay}`: {e}"))
            })?;
            config.editor_delay = Duration::from_millis(millis);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_user_message_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_message_suffix = suffix.into();
        self
    }

    pub fn with_editor_delay(mut self, delay: Duration) -> Self {
        self.editor_delay = delay;
        self
    }

    /// Temperature is always 0.
    pub(crate) fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions::default().with_model(self.model.clone())
    }
}

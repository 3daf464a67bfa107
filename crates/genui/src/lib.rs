//! # `genui` – The umbrella crate
//!
//! Renders a chat model's answer either as streamed prose or as a UI
//! component picked through a function call. This crate glues the
//! building blocks of the workspace into a ready-to-use chat session:
//!
//! | Crate / module      | What it provides                                                          |
//! |---------------------|---------------------------------------------------------------------------|
//! | **`genui-core`**    | Registry, dispatcher, history and the provider trait (re-exported here)   |
//! | **`genui-openai`**  | Streaming OpenAI chat completions backend *(feature `openai`, default)*   |
//! | [`session`]         | [`ChatSession`]: history + dispatcher + background tasks                  |
//! | [`bridge`]          | [`PresentationBridge`]: where prose and component results go              |
//! | [`sandpack`]        | The `show_sandpack_editor` operation and its prompts                      |
//! | [`config`]          | [`SessionConfig`], with environment overrides                             |
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use genui::{
//!     ChatSession, Dispatcher, SessionConfig, bridge::BridgeEvent, openai::OpenAiAdapterBuilder,
//!     sandpack::default_registry,
//! };
//!
//! # async fn run() -> genui::error::Result<()> {
//! let backend = OpenAiAdapterBuilder::new_from_env().build()?;
//! let mut session = ChatSession::new(
//!     Dispatcher::new(backend),
//!     Arc::new(default_registry()?),
//!     SessionConfig::from_env()?,
//! );
//!
//! let (bridge, mut events) = tokio::sync::mpsc::unbounded_channel::<BridgeEvent>();
//! session.submit_user_message("Build me a counter button", &bridge).await?;
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! * `openai` *(default)* – re-exports `genui-openai` as [`openai`].
//! * `openai-tracing` – wire-level trace logging inside the OpenAI backend.
pub use genui_core::*;

#[cfg(feature = "openai")]
pub use genui_openai as openai;

pub mod bridge;
pub mod config;
pub mod sandpack;
pub mod session;

pub use bridge::{BridgeEvent, PresentationBridge};
pub use config::SessionConfig;
pub use session::ChatSession;

//! OpenAI backend for genui.
//!
//! [`OpenAiAdapter`] implements [`genui_core::provider::StreamingEventsProvider`]
//! on top of the streaming *chat/completions* endpoint, using the
//! `functions` / `function_call` flavour of function calling.
mod adapter;
mod model_map;
mod provider_impl_chat_stream;

pub use adapter::{OpenAiAdapter, OpenAiAdapterBuilder};
pub use client::OpenAiClient;
pub use model_map::map_model;
pub mod api_v1;
mod client;
pub mod error;
pub mod sse;

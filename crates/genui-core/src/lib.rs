//! # `genui-core`
//!
//! Provider-agnostic building blocks for rendering model output as UI:
//!
//! | Module         | What it provides                                                   |
//! |----------------|--------------------------------------------------------------------|
//! | [`generic`]    | Conversation turns, roles, function specs and stream events         |
//! | [`function`]   | The [`FunctionDefinition`] trait binding a name to typed arguments  |
//! | [`registry`]   | [`FunctionRegistry`]: advertise operations, validate their arguments |
//! | [`history`]    | [`HistoryStore`]: the append-only conversation of one session      |
//! | [`provider`]   | [`StreamingEventsProvider`], implemented by backend crates          |
//! | [`dispatcher`] | [`Dispatcher`]: one streamed turn, prose or a single function call  |
pub mod dispatcher;
pub mod error;
pub mod function;
pub mod generic;
pub mod history;
pub mod model;
pub mod provider;
pub mod registry;
pub mod schema_util;

pub use dispatcher::{DispatchOptions, DispatchOutcome, Dispatcher, StreamHandle};
pub use function::FunctionDefinition;
pub use history::HistoryStore;
pub use provider::StreamingEventsProvider;
pub use registry::{FunctionRegistry, FunctionSchema};

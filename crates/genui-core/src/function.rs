//! Typed description of an operation the model may call.
//!
//! A developer needs a single trait to go from “a Rust struct” to “a function
//! the model can invoke”: [`FunctionDefinition`] binds a name, a description
//! and the argument type together. The registry derives the JSON Schema from
//! `Arguments` and decodes the provider's raw arguments into it, so a
//! subscriber registered for `F` can only ever receive `F::Arguments`.
//!
//! ```rust
//! use genui_core::function::FunctionDefinition;
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct OpenFileArgs {
//!     /// Path relative to the project root.
//!     path: String,
//! }
//!
//! struct OpenFile;
//!
//! impl FunctionDefinition for OpenFile {
//!     type Arguments = OpenFileArgs;
//!     const NAME: &'static str = "open_file";
//!     const DESCRIPTION: &'static str = "Open a file in the editor.";
//! }
//! ```
use std::any::Any;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Default content of the function-role turn appended after a call.
pub const DEFAULT_ACKNOWLEDGEMENT: &str = "[Function call handled.]";

pub trait FunctionDefinition: 'static {
    /// Arguments the model has to supply. Missing required fields or wrong
    /// types surface as an argument validation error.
    type Arguments: JsonSchema + DeserializeOwned + Any + Send;

    /// Unique name advertised to the model.
    const NAME: &'static str;

    /// Natural-language hint shown to the model.
    const DESCRIPTION: &'static str;

    /// Short, fixed, machine-readable summary recorded in the history once
    /// the call has been handled.
    const ACKNOWLEDGEMENT: &'static str = DEFAULT_ACKNOWLEDGEMENT;
}

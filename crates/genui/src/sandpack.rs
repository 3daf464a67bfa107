//! The one operation this application offers the model: render code in a
//! Sandpack editor with live preview.
use genui_core::{error::Result, function::FunctionDefinition, registry::FunctionRegistry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Instructions sent as the leading system turn of every request.
pub const SYSTEM_MESSAGE: &str = "\
You are a code assistant that helps users build and preview React components with Sandpack.
You help them write and refine their React code step by step.
Messages inside [] describe a UI element or a user event, for example:
- \"[User requests to show a Sandpack editor with the provided code]\": the user wants to see the code in a Sandpack editor.
- \"[User has updated the code]\": the user changed the code.
Whenever code should be displayed, call `show_sandpack_editor` with the complete code as a React component.
Never show code to the user in prose. ALWAYS use the `show_sandpack_editor` function call for code.
The `code` argument must be a string that keeps the JSON object valid. Only send valid JSON.
Use inline CSS for styling. Do not write or reference an app.css file.";

/// Appended to every user message. Apostrophes inside code are the usual
/// reason for broken function-call JSON.
pub const JSON_WARNING_SUFFIX: &str = "\n\nFrom now on, never show code to me. Always use the \
function call and always send valid JSON; it often breaks because of apostrophes.";

/// Arguments of [`ShowSandpackEditor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SandpackEditorArgs {
    /// The code to be displayed in Sandpack.
    pub code: String,
}

/// `show_sandpack_editor`: show the code editor and preview.
#[derive(Debug, Clone, Copy)]
pub struct ShowSandpackEditor;

impl FunctionDefinition for ShowSandpackEditor {
    type Arguments = SandpackEditorArgs;

    const NAME: &'static str = "show_sandpack_editor";
    const DESCRIPTION: &'static str = "Show the code editor and preview using Sandpack.";
    const ACKNOWLEDGEMENT: &'static str = "[Sandpack editor loaded with provided code.]";
}

/// Registry with every operation the application offers.
pub fn default_registry() -> Result<FunctionRegistry> {
    let mut registry = FunctionRegistry::new();
    registry.register_function::<ShowSandpackEditor>()?;
    Ok(registry)
}

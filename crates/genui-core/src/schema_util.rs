//! Helpers for turning Rust type information into the JSON Schema that is
//! advertised as a function's `parameters`. The JSON is produced with
//! [`schemars`].

use schemars::{JsonSchema, SchemaGenerator, r#gen::SchemaSettings};
use serde_json::Value;

use crate::error::Result;

/// Generate a JSON Schema for `T` **inline**, i.e. without `$ref` pointers to
/// external definitions, and without the `$schema` meta key.
///
/// ```
/// use genui_core::schema_util::derive_parameters_schema;
/// use schemars::JsonSchema;
///
/// #[derive(JsonSchema)]
/// struct Foo { bar: String }
///
/// let schema = derive_parameters_schema::<Foo>().unwrap();
/// assert_eq!(schema["type"], "object");
/// assert!(schema.get("$schema").is_none());
/// ```
pub fn derive_parameters_schema<T>() -> Result<Value>
where
    T: JsonSchema,
{
    // Inlined: some providers don't resolve `$ref`s.
    let mut settings = SchemaSettings::draft07();
    settings.inline_subschemas = true;

    let generator = SchemaGenerator::new(settings);
    let root = generator.into_root_schema_for::<T>();

    let mut value = serde_json::to_value(root)?;
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
    }
    Ok(value)
}

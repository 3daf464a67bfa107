//! Catalog of the operations the model may invoke.
//!
//! The registry serves two purposes:
//!
//! 1. advertise the callable operations to the provider
//!    ([`FunctionRegistry::describe_all`]), in registration order;
//! 2. validate and decode the arguments the provider returns
//!    ([`FunctionRegistry::validate`]).
//!
//! It is filled once at startup and read concurrently afterwards, usually
//! behind an `Arc`. Nothing can be removed or replaced once registered.
use std::{
    any::{Any, type_name},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{GenuiError, Result},
    function::{DEFAULT_ACKNOWLEDGEMENT, FunctionDefinition},
    generic::GenericFunctionSpec,
    schema_util::derive_parameters_schema,
};

type Decoder =
    Arc<dyn Fn(&Value) -> std::result::Result<Box<dyn Any + Send>, String> + Send + Sync>;

/// A registered operation: name, description, parameter schema and the
/// decoder validating candidate arguments.
#[derive(Clone)]
pub struct FunctionSchema {
    name: String,
    description: String,
    parameters: Value,
    acknowledgement: String,
    decoder: Decoder,
}

impl FunctionSchema {
    /// Schema for a [`FunctionDefinition`].
    pub fn of<F: FunctionDefinition>() -> Result<Self> {
        Ok(Self::new::<F::Arguments>(F::NAME, F::DESCRIPTION)?
            .with_acknowledgement(F::ACKNOWLEDGEMENT))
    }

    /// Schema for an ad-hoc operation whose arguments decode into `T`.
    pub fn new<T>(name: impl Into<String>, description: impl Into<String>) -> Result<Self>
    where
        T: JsonSchema + DeserializeOwned + Any + Send,
    {
        let decoder: Decoder = Arc::new(|raw: &Value| {
            serde_json::from_value::<T>(raw.clone())
                .map(|value| Box::new(value) as Box<dyn Any + Send>)
                .map_err(|e| e.to_string())
        });

        Ok(Self {
            name: name.into(),
            description: description.into(),
            parameters: derive_parameters_schema::<T>()?,
            acknowledgement: DEFAULT_ACKNOWLEDGEMENT.to_string(),
            decoder,
        })
    }

    pub fn with_acknowledgement(mut self, acknowledgement: impl Into<String>) -> Self {
        self.acknowledgement = acknowledgement.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// JSON Schema of the arguments.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    pub fn acknowledgement(&self) -> &str {
        &self.acknowledgement
    }

    pub fn to_spec(&self) -> GenericFunctionSpec {
        GenericFunctionSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
        }
    }

    fn decode(&self, raw: &Value) -> Result<DecodedCall> {
        let arguments = (self.decoder)(raw).map_err(|diagnostic| GenuiError::ArgumentValidation {
            name: self.name.clone(),
            raw_arguments: raw.clone(),
            diagnostic,
        })?;

        Ok(DecodedCall {
            name: self.name.clone(),
            raw_arguments: raw.clone(),
            arguments,
        })
    }
}

impl fmt::Debug for FunctionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSchema")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("acknowledgement", &self.acknowledgement)
            .finish_non_exhaustive()
    }
}

/// Validated arguments of a function call, decoded into the registered
/// argument type.
pub struct DecodedCall {
    name: String,
    raw_arguments: Value,
    arguments: Box<dyn Any + Send>,
}

impl DecodedCall {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The arguments as received, known to conform to the schema.
    pub fn raw_arguments(&self) -> &Value {
        &self.raw_arguments
    }

    /// Take the typed value out.
    ///
    /// # Errors
    ///
    /// [`GenuiError::Invalid`] if `T` isn't the type the schema was
    /// registered with.
    pub fn downcast<T: Any>(self) -> Result<T> {
        let DecodedCall {
            name, arguments, ..
        } = self;

        arguments.downcast::<T>().map(|value| *value).map_err(|_| {
            GenuiError::Invalid(format!(
                "arguments of `{name}` are not of type `{}`",
                type_name::<T>()
            ))
        })
    }
}

impl fmt::Debug for DecodedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedCall")
            .field("name", &self.name)
            .field("raw_arguments", &self.raw_arguments)
            .finish_non_exhaustive()
    }
}

/// Name → schema mapping with a stable registration order.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    schemas: Vec<FunctionSchema>,
    index: HashMap<String, usize>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `schema` to the registry.
    ///
    /// # Errors
    ///
    /// [`GenuiError::DuplicateName`] if the name is taken. The registry is
    /// left untouched in that case.
    pub fn register(&mut self, schema: FunctionSchema) -> Result<()> {
        if self.index.contains_key(schema.name()) {
            return Err(GenuiError::DuplicateName {
                name: schema.name().to_string(),
            });
        }

        self.index.insert(schema.name().to_string(), self.schemas.len());
        self.schemas.push(schema);
        Ok(())
    }

    /// Shorthand for `register(FunctionSchema::of::<F>()?)`.
    pub fn register_function<F: FunctionDefinition>(&mut self) -> Result<()> {
        self.register(FunctionSchema::of::<F>()?)
    }

    /// Provider-facing specs in registration order.
    pub fn describe_all(&self) -> Vec<GenericFunctionSpec> {
        self.schemas.iter().map(FunctionSchema::to_spec).collect()
    }

    /// Validate `raw` against the schema registered as `name`.
    ///
    /// # Errors
    ///
    /// * [`GenuiError::UnknownFunction`] – `name` isn't registered.
    /// * [`GenuiError::ArgumentValidation`] – `raw` doesn't decode; carries
    ///   the raw arguments and the decoder's diagnostic.
    pub fn validate(&self, name: &str, raw: &Value) -> Result<DecodedCall> {
        self.get(name)
            .ok_or_else(|| GenuiError::UnknownFunction {
                name: name.to_string(),
            })?
            .decode(raw)
    }

    /// Typed variant of [`Self::validate`].
    pub fn validate_as<F: FunctionDefinition>(&self, raw: &Value) -> Result<F::Arguments> {
        self.validate(F::NAME, raw)?.downcast::<F::Arguments>()
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSchema> {
        self.index.get(name).map(|&position| &self.schemas[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(FunctionSchema::name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

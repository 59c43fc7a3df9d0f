//! Tool descriptors and their input schemas.
//!
//! A descriptor advertises a tool's contract: its name, a description, and
//! the parameters it accepts. Descriptors are rendered as JSON Schema objects
//! for discovery and validated against by the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Parameter Types
// ============================================================================

/// The JSON type a tool parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

impl ParamType {
    /// The JSON Schema type keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Check whether a JSON value is an instance of this type.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the JSON type of a value, for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Input Schema
// ============================================================================

/// Declaration of a single tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Accepted JSON type.
    #[serde(rename = "type")]
    pub param_type: ParamType,

    /// Whether the parameter must be supplied.
    pub required: bool,

    /// Optional description shown to clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamSpec {
    /// A required parameter of the given type.
    pub fn required(param_type: ParamType) -> Self {
        Self {
            param_type,
            required: true,
            description: None,
        }
    }

    /// An optional parameter of the given type.
    pub fn optional(param_type: ParamType) -> Self {
        Self {
            param_type,
            required: false,
            description: None,
        }
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Parameter name to declaration.
///
/// Parameters are kept sorted by name so validation visits them in a
/// deterministic order and the first reported violation is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSchema {
    params: BTreeMap<String, ParamSpec>,
}

impl InputSchema {
    /// An empty schema (tool takes no parameters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter declaration, replacing any previous one with that name.
    pub fn param(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.params.insert(name.into(), spec);
        self
    }

    /// Look up a parameter declaration.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.get(name)
    }

    /// Iterate over declared parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.params.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameters are declared.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|(name, spec)| {
                let mut prop = Map::new();
                prop.insert("type".into(), json!(spec.param_type.as_str()));
                if let Some(description) = &spec.description {
                    prop.insert("description".into(), json!(description));
                }
                (name.clone(), Value::Object(prop))
            })
            .collect();

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.as_str())
            .collect();

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), json!(required));
        schema
    }
}

// ============================================================================
// Tool Descriptor
// ============================================================================

/// Metadata advertising a tool's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    input_schema: InputSchema,
}

impl ToolDescriptor {
    /// Create a new descriptor.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &InputSchema {
        &self.input_schema
    }

    /// Discovery form: `{name, description, inputSchema}`.
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema.to_json_schema(),
        })
    }
}

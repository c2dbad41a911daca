//! Argument schemas for catalog operations.
//!
//! Field specs are `const` so the whole catalog can live in static data. Each
//! spec renders itself as a JSON Schema property for `tools/list`.

use serde_json::{Map, Value, json};

/// JSON kind a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    Object,
    ObjectArray(&'static [FieldSpec]),
}

impl FieldKind {
    pub fn json_type(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::ObjectArray(_) => "array",
        }
    }
}

/// Extra shape checks applied to a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Free,
    /// Single bracket-quotable name.
    Identifier,
    /// Dotted name of up to three parts.
    ObjectName,
    /// Routine parameter name, `@` optional.
    ParameterName,
    /// Column or return type.
    DataType,
    /// Object whose keys are parameter names.
    ParameterMap,
}

/// Value used when an optional field is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// The configured default schema.
    Schema,
    Integer(i64),
    Text(&'static str),
}

/// One declared argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub allowed_values: &'static [&'static str],
    pub default: Option<FieldDefault>,
    pub minimum: Option<i64>,
    pub format: Format,
}

impl FieldSpec {
    const fn new(name: &'static str, description: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            description,
            kind,
            required: false,
            allowed_values: &[],
            default: None,
            minimum: None,
            format: Format::Free,
        }
    }

    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, FieldKind::String)
    }

    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, FieldKind::Integer)
    }

    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, FieldKind::Boolean)
    }

    pub const fn object(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, FieldKind::Object)
    }

    pub const fn object_array(
        name: &'static str,
        description: &'static str,
        items: &'static [FieldSpec],
    ) -> Self {
        Self::new(name, description, FieldKind::ObjectArray(items))
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed_values = values;
        self
    }

    pub const fn default_schema(mut self) -> Self {
        self.default = Some(FieldDefault::Schema);
        self
    }

    pub const fn default_integer(mut self, value: i64) -> Self {
        self.default = Some(FieldDefault::Integer(value));
        self
    }

    pub const fn default_text(mut self, value: &'static str) -> Self {
        self.default = Some(FieldDefault::Text(value));
        self
    }

    pub const fn minimum(mut self, value: i64) -> Self {
        self.minimum = Some(value);
        self
    }

    pub const fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub const fn identifier(self) -> Self {
        self.format(Format::Identifier)
    }

    /// JSON Schema for this field.
    pub fn json_schema(&self, default_schema: &str) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.kind.json_type()));
        schema.insert("description".into(), json!(self.description));

        if !self.allowed_values.is_empty() {
            schema.insert("enum".into(), json!(self.allowed_values));
        }
        if let Some(minimum) = self.minimum {
            schema.insert("minimum".into(), json!(minimum));
        }
        match self.default {
            Some(FieldDefault::Schema) => {
                schema.insert("default".into(), json!(default_schema));
            }
            Some(FieldDefault::Integer(value)) => {
                schema.insert("default".into(), json!(value));
            }
            Some(FieldDefault::Text(value)) => {
                schema.insert("default".into(), json!(value));
            }
            None => {}
        }
        if self.format == Format::ParameterMap {
            schema.insert(
                "additionalProperties".into(),
                json!({ "type": ["string", "number", "boolean", "null"] }),
            );
        }
        if let FieldKind::ObjectArray(items) = self.kind {
            schema.insert("items".into(), object_schema(items, default_schema));
        }

        Value::Object(schema)
    }
}

/// JSON Schema for an object with the given fields.
pub fn object_schema(fields: &[FieldSpec], default_schema: &str) -> Value {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|field| (field.name.to_string(), field.json_schema(default_schema)))
        .collect();
    let required: Vec<&str> = fields
        .iter()
        .filter(|field| field.required)
        .map(|field| field.name)
        .collect();

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

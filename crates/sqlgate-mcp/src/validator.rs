//! Argument validation for catalog operations.
//!
//! Raw JSON arguments are checked against an operation's declared fields
//! before any statement is generated:
//! - **Presence**: required fields must be present and non-null
//! - **Kind**: string, integer, boolean, object or array of objects
//! - **Constraints**: allowed values, minimums, identifier and type-name shapes
//!
//! The result is a [`ValidatedArguments`] holding only declared fields, with
//! defaults filled in.

use crate::catalog::{FieldDefault, FieldKind, FieldSpec, Format, OperationDefinition};
use crate::sql;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// VALIDATION ERROR TYPES
// =============================================================================

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// Path of the offending field, e.g. `columns[2].dataType`.
    pub field: String,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(kind: ValidationErrorKind, field: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ValidationErrorKind::MissingField,
            field,
            format!("Missing required field '{}'", field),
        )
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(field: &str, expected: &str, found: &Value) -> Self {
        Self::new(
            ValidationErrorKind::TypeMismatch,
            field,
            format!(
                "Field '{}' must be of type {}, got {}",
                field,
                expected,
                json_kind(found)
            ),
        )
    }

    /// Create an invalid enum value error.
    pub fn invalid_enum(field: &str, value: &str, allowed: &[&str]) -> Self {
        Self::new(
            ValidationErrorKind::InvalidEnum,
            field,
            format!(
                "Field '{}' has value '{}', expected one of: {}",
                field,
                value,
                allowed.join(", ")
            ),
        )
    }

    /// Create an out of range error.
    pub fn out_of_range(field: &str, value: i64, minimum: i64) -> Self {
        Self::new(
            ValidationErrorKind::OutOfRange,
            field,
            format!(
                "Field '{}' must be at least {}, got {}",
                field, minimum, value
            ),
        )
    }

    /// Create an invalid identifier error.
    pub fn invalid_identifier(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ValidationErrorKind::InvalidIdentifier,
            field,
            format!("Field '{}' is not usable as a SQL name: {}", field, reason),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Kinds of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required field absent or null.
    MissingField,
    /// Field present with the wrong JSON kind.
    TypeMismatch,
    /// Value not among the allowed values.
    InvalidEnum,
    /// Integer below the declared minimum.
    OutOfRange,
    /// Name cannot be safely placed into SQL.
    InvalidIdentifier,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingField => "missing_field",
            ValidationErrorKind::TypeMismatch => "type_mismatch",
            ValidationErrorKind::InvalidEnum => "invalid_enum",
            ValidationErrorKind::OutOfRange => "out_of_range",
            ValidationErrorKind::InvalidIdentifier => "invalid_identifier",
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// VALIDATED ARGUMENTS
// =============================================================================

/// A typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Object(Map<String, Value>),
    Items(Vec<ValidatedArguments>),
}

/// Declared fields of one call (or one array element), typed and defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArguments {
    values: HashMap<&'static str, ArgValue>,
}

impl ValidatedArguments {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Boolean flag; absent means `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Boolean(true)))
    }

    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        match self.values.get(name) {
            Some(ArgValue::Object(value)) => Some(value),
            _ => None,
        }
    }

    /// Elements of an array-of-object field; empty when absent.
    pub fn items(&self, name: &str) -> &[ValidatedArguments] {
        match self.values.get(name) {
            Some(ArgValue::Items(items)) => items,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: &'static str, value: ArgValue) {
        self.values.insert(name, value);
    }
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// Validates raw arguments against an operation's declared fields.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentValidator<'a> {
    default_schema: &'a str,
}

impl<'a> ArgumentValidator<'a> {
    /// Create a validator that fills `schemaName` defaults with `default_schema`.
    pub fn new(default_schema: &'a str) -> Self {
        Self { default_schema }
    }

    /// Validate a call's arguments. Absent or null arguments count as `{}`.
    pub fn validate(
        &self,
        definition: &OperationDefinition,
        arguments: &Value,
    ) -> Result<ValidatedArguments, ValidationError> {
        let empty = Map::new();
        let object = match arguments {
            Value::Null => &empty,
            Value::Object(object) => object,
            other => return Err(ValidationError::type_mismatch("arguments", "object", other)),
        };
        self.validate_fields(definition.arguments, object, "")
    }

    fn validate_fields(
        &self,
        fields: &'static [FieldSpec],
        object: &Map<String, Value>,
        prefix: &str,
    ) -> Result<ValidatedArguments, ValidationError> {
        let mut validated = ValidatedArguments::default();

        for field in fields {
            let path = format!("{}{}", prefix, field.name);
            match object.get(field.name).filter(|value| !value.is_null()) {
                Some(value) => {
                    let typed = self.validate_value(field, value, &path)?;
                    validated.insert(field.name, typed);
                }
                None if field.required => return Err(ValidationError::missing_field(&path)),
                None => {
                    if let Some(default) = self.default_value(field) {
                        validated.insert(field.name, default);
                    }
                }
            }
        }

        Ok(validated)
    }

    fn default_value(&self, field: &FieldSpec) -> Option<ArgValue> {
        match field.default? {
            FieldDefault::Schema => Some(ArgValue::Text(self.default_schema.to_string())),
            FieldDefault::Integer(value) => Some(ArgValue::Integer(value)),
            FieldDefault::Text(value) => Some(ArgValue::Text(value.to_string())),
        }
    }

    fn validate_value(
        &self,
        field: &FieldSpec,
        value: &Value,
        path: &str,
    ) -> Result<ArgValue, ValidationError> {
        match field.kind {
            FieldKind::String => {
                let text = value
                    .as_str()
                    .ok_or_else(|| ValidationError::type_mismatch(path, "string", value))?;
                if !field.allowed_values.is_empty()
                    && !field.allowed_values.iter().any(|allowed| *allowed == text)
                {
                    return Err(ValidationError::invalid_enum(
                        path,
                        text,
                        field.allowed_values,
                    ));
                }
                check_format(field.format, text, path)?;
                Ok(ArgValue::Text(text.to_string()))
            }
            FieldKind::Integer => {
                let number = value
                    .as_i64()
                    .ok_or_else(|| ValidationError::type_mismatch(path, "integer", value))?;
                if let Some(minimum) = field.minimum
                    && number < minimum
                {
                    return Err(ValidationError::out_of_range(path, number, minimum));
                }
                Ok(ArgValue::Integer(number))
            }
            FieldKind::Boolean => value
                .as_bool()
                .map(ArgValue::Boolean)
                .ok_or_else(|| ValidationError::type_mismatch(path, "boolean", value)),
            FieldKind::Object => {
                let object = value
                    .as_object()
                    .ok_or_else(|| ValidationError::type_mismatch(path, "object", value))?;
                if field.format == Format::ParameterMap {
                    for key in object.keys() {
                        sql::parameter_name(key).map_err(|e| {
                            ValidationError::invalid_identifier(&format!("{}.{}", path, key), e)
                        })?;
                    }
                }
                Ok(ArgValue::Object(object.clone()))
            }
            FieldKind::ObjectArray(items) => {
                let elements = value
                    .as_array()
                    .ok_or_else(|| ValidationError::type_mismatch(path, "array", value))?;
                let mut validated = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    let element_path = format!("{}[{}]", path, index);
                    let object = element.as_object().ok_or_else(|| {
                        ValidationError::type_mismatch(&element_path, "object", element)
                    })?;
                    validated.push(self.validate_fields(
                        items,
                        object,
                        &format!("{}.", element_path),
                    )?);
                }
                Ok(ArgValue::Items(validated))
            }
        }
    }
}

fn check_format(format: Format, text: &str, path: &str) -> Result<(), ValidationError> {
    let checked = match format {
        Format::Free | Format::ParameterMap => Ok(()),
        Format::Identifier => sql::check_identifier(text),
        Format::ObjectName => sql::check_multipart_name(text),
        Format::ParameterName => sql::parameter_name(text).map(|_| ()),
        Format::DataType => sql::check_data_type(text),
    };
    checked.map_err(|e| ValidationError::invalid_identifier(path, e))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, OperationDefinition, ResultMode};
    use crate::generators::GenerationError;
    use serde_json::json;
    use sqlgate_runtime::SqlStatement;

    const COLUMN: &[FieldSpec] = &[
        FieldSpec::string("name", "Column name").required().identifier(),
        FieldSpec::string("dataType", "Type")
            .required()
            .format(Format::DataType),
        FieldSpec::boolean("nullable", "Allow NULL"),
    ];

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::string("tableName", "Table").required().identifier(),
        FieldSpec::string("schemaName", "Schema")
            .identifier()
            .default_schema(),
        FieldSpec::integer("limit", "Row limit").minimum(1),
        FieldSpec::integer("days", "Days").minimum(0).default_integer(7),
        FieldSpec::string("mode", "Mode").one_of(&["FAST", "SLOW"]),
        FieldSpec::object("parameters", "Params").format(Format::ParameterMap),
        FieldSpec::object_array("columns", "Columns", COLUMN),
    ];

    fn noop(_: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
        Ok(SqlStatement::new("SELECT 1"))
    }

    const TEST_OP: OperationDefinition = OperationDefinition {
        name: "test_op",
        description: "Test operation",
        category: Category::Data,
        arguments: FIELDS,
        generator: noop,
        result: ResultMode::Rows,
    };

    fn validate(arguments: Value) -> Result<ValidatedArguments, ValidationError> {
        ArgumentValidator::new("dbo").validate(&TEST_OP, &arguments)
    }

    #[test]
    fn test_defaults_are_filled() {
        let args = validate(json!({ "tableName": "Orders" })).unwrap();
        assert_eq!(args.text("tableName"), Some("Orders"));
        assert_eq!(args.text("schemaName"), Some("dbo"));
        assert_eq!(args.integer("days"), Some(7));
        assert_eq!(args.integer("limit"), None);
        assert!(!args.flag("nullable"));
    }

    #[test]
    fn test_configured_default_schema() {
        let args = ArgumentValidator::new("sales")
            .validate(&TEST_OP, &json!({ "tableName": "Orders" }))
            .unwrap();
        assert_eq!(args.text("schemaName"), Some("sales"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = validate(json!({})).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert_eq!(err.field, "tableName");
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let err = validate(json!({ "tableName": null })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
    }

    #[test]
    fn test_null_optional_field_takes_default() {
        let args = validate(json!({ "tableName": "T", "schemaName": null })).unwrap();
        assert_eq!(args.text("schemaName"), Some("dbo"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = validate(json!({ "tableName": 5 })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TypeMismatch);
        assert!(err.message.contains("string"));
    }

    #[test]
    fn test_float_is_not_an_integer() {
        let err = validate(json!({ "tableName": "T", "limit": 2.5 })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(err.field, "limit");
    }

    #[test]
    fn test_minimum() {
        let err = validate(json!({ "tableName": "T", "limit": 0 })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange);
        assert!(validate(json!({ "tableName": "T", "days": 0 })).is_ok());
        let err = validate(json!({ "tableName": "T", "days": -1 })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange);
    }

    #[test]
    fn test_enum_is_case_sensitive() {
        assert!(validate(json!({ "tableName": "T", "mode": "FAST" })).is_ok());
        let err = validate(json!({ "tableName": "T", "mode": "fast" })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidEnum);
    }

    #[test]
    fn test_invalid_identifier() {
        let err = validate(json!({ "tableName": "[Orders]" })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidIdentifier);
        let err = validate(json!({ "tableName": "" })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidIdentifier);
    }

    #[test]
    fn test_parameter_map_keys() {
        assert!(validate(json!({ "tableName": "T", "parameters": { "@id": 1, "name": "x" } })).is_ok());
        let err = validate(json!({ "tableName": "T", "parameters": { "bad key": 1 } })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidIdentifier);
        assert_eq!(err.field, "parameters.bad key");
    }

    #[test]
    fn test_array_element_path() {
        let err = validate(json!({
            "tableName": "T",
            "columns": [
                { "name": "Id", "dataType": "INT" },
                { "name": "Name", "dataType": "NVARCHAR(50)" },
                { "name": "Bad", "dataType": "INT; DROP TABLE T" }
            ]
        }))
        .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidIdentifier);
        assert_eq!(err.field, "columns[2].dataType");
    }

    #[test]
    fn test_array_element_missing_field() {
        let err = validate(json!({ "tableName": "T", "columns": [{ "name": "Id" }] })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert_eq!(err.field, "columns[0].dataType");
    }

    #[test]
    fn test_array_element_must_be_object() {
        let err = validate(json!({ "tableName": "T", "columns": ["Id"] })).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(err.field, "columns[0]");
    }

    #[test]
    fn test_extra_fields_are_dropped() {
        let args = validate(json!({ "tableName": "T", "surprise": true })).unwrap();
        assert!(!args.contains("surprise"));
    }

    #[test]
    fn test_non_object_arguments() {
        let err = validate(json!([1, 2])).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(err.field, "arguments");
        // null arguments behave like {}
        let err = validate(Value::Null).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
    }

    #[test]
    fn test_items_accessor() {
        let args = validate(json!({
            "tableName": "T",
            "columns": [{ "name": "Id", "dataType": "INT", "nullable": true }]
        }))
        .unwrap();
        let columns = args.items("columns");
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].text("name"), Some("Id"));
        assert!(columns[0].flag("nullable"));
        assert!(args.items("missing").is_empty());
    }
}

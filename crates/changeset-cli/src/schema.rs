//! # Schema Files
//!
//! Loads a field schema from YAML and turns it into field builders. The file
//! is a serialized form of the `field` / `field_type` / `validation`
//! combinators; every rule compiles to `required()` or
//! `validate(reason, predicate)`.
//!
//! ```yaml
//! fields:
//!   - key: firstName
//!     label: First Name
//!     rules: [required, { max_length: 40 }]
//!   - key: age
//!     type: number
//!     default: 18
//!     rules:
//!       - min: 0
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use changeset_core::Value;
use changeset_schema::{
    field, field_type, label, required, validate, validation, FieldBuilder, FieldType,
    TypeOptions, TypeRegistry, Validator,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading a schema or change file.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not valid YAML for this format.
    #[error("invalid schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The change file is not a JSON object of field values.
    #[error("invalid change JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule cannot be compiled.
    #[error("invalid rule on field '{key}': {reason}")]
    InvalidRule { key: String, reason: String },

    /// The default does not convert to the field's declared type.
    #[error("default '{value}' of field '{key}' is not a valid {field_type}")]
    InvalidDefault {
        key: String,
        field_type: FieldType,
        value: Value,
    },
}

/// A declarative validation rule. Written as a bare name (`required`) or a
/// single-key map (`min: 0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    Min(f64),
    Max(f64),
    MinLength(usize),
    MaxLength(usize),
    OneOf(Vec<Value>),
}

/// `one_of` membership. Integers and floats compare numerically.
fn one_of_contains(allowed: &[Value], value: &Value) -> bool {
    allowed.iter().any(|candidate| match (candidate.as_f64(), value.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => candidate.same_as(value),
    })
}

impl Rule {
    fn compile(&self, key: &str) -> Result<Validator, SchemaError> {
        let validator = match self {
            Self::Required => required(),
            Self::Min(min) => {
                let min = *min;
                validate(format!("must be at least {min}"), move |v: &Value| {
                    v.as_f64().is_some_and(|x| x >= min)
                })
            }
            Self::Max(max) => {
                let max = *max;
                validate(format!("must be at most {max}"), move |v: &Value| {
                    v.as_f64().is_some_and(|x| x <= max)
                })
            }
            Self::MinLength(n) => {
                let n = *n;
                validate(format!("must be at least {n} characters"), move |v: &Value| {
                    v.to_string().chars().count() >= n
                })
            }
            Self::MaxLength(n) => {
                let n = *n;
                validate(format!("must be at most {n} characters"), move |v: &Value| {
                    v.to_string().chars().count() <= n
                })
            }
            Self::OneOf(allowed) => {
                if allowed.is_empty() {
                    return Err(SchemaError::InvalidRule {
                        key: key.to_string(),
                        reason: "one_of needs at least one value".to_string(),
                    });
                }
                let listed = allowed
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                let allowed = allowed.clone();
                validate(format!("must be one of {listed}"), move |v: &Value| {
                    one_of_contains(&allowed, v)
                })
            }
        };
        Ok(validator)
    }
}

/// One field entry of a schema file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub rules: Vec<Rule>,
}

impl FieldDecl {
    /// Translate into a field builder.
    ///
    /// A declared default goes through the type's from-input converter, so
    /// `default: 1` on a `float` field is stored as `1.0`.
    pub fn builder(&self) -> Result<FieldBuilder, SchemaError> {
        let mut builder = field(self.key.clone(), []);
        if let Some(text) = &self.label {
            builder = builder.with(label(text.clone()));
        }
        if self.field_type.is_some() || self.default.is_some() {
            let ty = self.field_type.clone().unwrap_or(FieldType::Text);
            let registry = TypeRegistry::global();
            if !registry.is_registered(&ty) {
                tracing::debug!(
                    key = %self.key,
                    field_type = %ty,
                    "unregistered type, using fallback converters"
                );
            }
            let mut options = TypeOptions::new();
            if let Some(value) = &self.default {
                let converted = (registry.lookup(&ty).from_input)(value);
                if converted.is_null() && !value.is_null() {
                    return Err(SchemaError::InvalidDefault {
                        key: self.key.clone(),
                        field_type: ty,
                        value: value.clone(),
                    });
                }
                options = options.value(converted);
            }
            builder = builder.with(field_type(ty, options));
        }
        if !self.rules.is_empty() {
            let validators = self
                .rules
                .iter()
                .map(|rule| rule.compile(&self.key))
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.with(validation(validators));
        }
        Ok(builder)
    }
}

/// Top-level schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    pub fields: Vec<FieldDecl>,
}

impl SchemaFile {
    pub fn from_yaml(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Field builders in declaration order.
    pub fn builders(&self) -> Result<Vec<FieldBuilder>, SchemaError> {
        self.fields.iter().map(FieldDecl::builder).collect()
    }
}

fn read(path: &Path) -> Result<String, SchemaError> {
    std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a schema file from disk.
pub fn load_schema(path: &Path) -> Result<SchemaFile, SchemaError> {
    let schema = SchemaFile::from_yaml(&read(path)?)?;
    tracing::debug!(path = %path.display(), fields = schema.fields.len(), "loaded schema");
    Ok(schema)
}

/// Load a JSON object of field key → value.
pub fn load_changes(path: &Path) -> Result<BTreeMap<String, Value>, SchemaError> {
    Ok(serde_json::from_str(&read(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use changeset_state::define;

    const PERSON: &str = r#"
fields:
  - key: firstName
    label: First Name
    rules: [required, { max_length: 5 }]
  - key: age
    type: number
    default: 18
    rules:
      - min: 0
      - max: 130
  - key: role
    default: viewer
    rules:
      - one_of: [viewer, editor]
  - key: subscribed
    type: boolean
"#;

    #[test]
    fn test_parse_schema_yaml() {
        let schema = SchemaFile::from_yaml(PERSON).unwrap();
        assert_eq!(schema.fields.len(), 4);
        assert_eq!(schema.fields[0].label.as_deref(), Some("First Name"));
        assert_eq!(
            schema.fields[0].rules,
            vec![Rule::Required, Rule::MaxLength(5)]
        );
        assert_eq!(schema.fields[1].field_type, Some(FieldType::Number));
        assert_eq!(schema.fields[1].default, Some(Value::Number(18)));
        assert_eq!(schema.fields[3].field_type, Some(FieldType::Boolean));
    }

    #[test]
    fn test_builders_compile_rules() {
        let cs = define(SchemaFile::from_yaml(PERSON).unwrap().builders().unwrap()).unwrap();
        assert_eq!(cs.data().get("age"), Some(&Value::from(18)));
        assert_eq!(cs.data().get("role"), Some(&Value::from("viewer")));
        assert_eq!(cs.data().get("subscribed"), Some(&Value::from(false)));
        assert_eq!(
            cs.errors_for_data().get("firstName").map(String::as_str),
            Some("is required")
        );

        let cx = cs
            .change([
                ("firstName", Value::from("Bartholomew")),
                ("age", Value::from(-1)),
                ("role", Value::from("admin")),
            ])
            .unwrap();
        assert_eq!(
            cx.errors_for_changes().get("firstName").map(String::as_str),
            Some("must be at most 5 characters")
        );
        assert_eq!(
            cx.errors_for_changes().get("age").map(String::as_str),
            Some("must be at least 0")
        );
        assert_eq!(
            cx.errors_for_changes().get("role").map(String::as_str),
            Some("must be one of viewer, editor")
        );
    }

    #[test]
    fn test_rules_accept_name_and_single_key_map_forms() {
        let schema = SchemaFile::from_yaml(
            "fields:\n  - key: firstName\n    label: First Name\n    rules: [required, { max_length: 40 }]\n  - key: age\n    type: number\n    default: 18\n    rules:\n      - min: 0\n      - one_of: [18, 21]\n",
        )
        .unwrap();
        assert_eq!(
            schema.fields[0].rules,
            vec![Rule::Required, Rule::MaxLength(40)]
        );
        assert_eq!(
            schema.fields[1].rules,
            vec![
                Rule::Min(0.0),
                Rule::OneOf(vec![Value::from(18), Value::from(21)])
            ]
        );
    }

    #[test]
    fn test_float_default_is_converted_to_declared_type() {
        let schema = SchemaFile::from_yaml(
            "fields:\n  - key: p\n    type: float\n    default: 1\n    rules:\n      - one_of: [1, 2]\n",
        )
        .unwrap();
        let cs = define(schema.builders().unwrap()).unwrap();
        assert_eq!(cs.data().get("p"), Some(&Value::Float(1.0)));
        assert!(cs.valid_data());

        let submitted = cs.field("p").unwrap().from_input_value(&Value::from("1"));
        let cx = cs.change([("p", submitted)]).unwrap();
        assert!(cx.changes().is_empty());
        assert!(cx.errors_for_changes().is_empty());

        let cx = cs.change([("p", 2.0)]).unwrap();
        assert!(cx.valid_changes());
        let cx = cs.change([("p", 3.0)]).unwrap();
        assert_eq!(
            cx.errors_for_changes().get("p").map(String::as_str),
            Some("must be one of 1, 2")
        );
    }

    #[test]
    fn test_one_of_matches_integers_and_floats_numerically() {
        let allowed = [Value::from(1), Value::from(2.5), Value::from("x")];
        assert!(one_of_contains(&allowed, &Value::from(1.0)));
        assert!(one_of_contains(&allowed, &Value::from(1)));
        assert!(!one_of_contains(&allowed, &Value::from(2)));
        assert!(one_of_contains(&allowed, &Value::from("x")));
        assert!(!one_of_contains(&allowed, &Value::from("1")));
    }

    #[test]
    fn test_unparsable_default_is_rejected() {
        let schema = SchemaFile::from_yaml(
            "fields:\n  - key: age\n    type: number\n    default: forty\n",
        )
        .unwrap();
        let err = schema.builders().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { ref key, .. } if key == "age"));
        assert!(err.to_string().contains("not a valid number"));
    }

    #[test]
    fn test_schema_serializes_back_to_yaml() {
        let schema = SchemaFile::from_yaml(PERSON).unwrap();
        let text = serde_yaml::to_string(&schema).unwrap();
        assert_eq!(SchemaFile::from_yaml(&text).unwrap(), schema);
    }

    #[test]
    fn test_empty_one_of_is_rejected() {
        let schema = SchemaFile::from_yaml("fields:\n  - key: x\n    rules:\n      - one_of: []\n")
            .unwrap();
        let err = schema.builders().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRule { ref key, .. } if key == "x"));
    }

    #[test]
    fn test_unknown_rule_is_a_yaml_error() {
        let err = SchemaFile::from_yaml("fields:\n  - key: x\n    rules: [shiny]\n").unwrap_err();
        assert!(matches!(err, SchemaError::Yaml(_)));
    }

    #[test]
    fn test_load_schema_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("person.yaml");
        std::fs::write(&path, PERSON).unwrap();
        let schema = load_schema(&path).unwrap();
        assert_eq!(schema.fields[0].key, "firstName");
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_schema(Path::new("/nonexistent/schema.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/schema.yaml"));
    }

    #[test]
    fn test_load_changes_requires_object() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"age": 30, "firstName": "Ada"}"#).unwrap();
        let changes = load_changes(&good).unwrap();
        assert_eq!(changes.get("age"), Some(&Value::from(30)));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[1, 2]").unwrap();
        assert!(matches!(load_changes(&bad), Err(SchemaError::Json(_))));
    }
}

//! # Describe Subcommand
//!
//! Prints the compiled configuration of every field in a schema: key,
//! label, type, default value and the default's input representation.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use changeset_core::Value;
use changeset_schema::FieldConfig;
use changeset_state::define;

use crate::schema::load_schema;

/// Arguments for the describe subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Path to the YAML schema file.
    pub schema: PathBuf,
}

/// JSON view of one field configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub default: Value,
    pub default_input: Value,
    pub validators: usize,
}

impl From<&FieldConfig> for FieldSummary {
    fn from(config: &FieldConfig) -> Self {
        Self {
            key: config.key().to_string(),
            label: config.label().to_string(),
            field_type: config.field_type().to_string(),
            default: config.value().clone(),
            default_input: config.to_input_value(config.value()),
            validators: config.validator().len(),
        }
    }
}

/// Summaries for every field declared in the schema at `args.schema`.
pub fn describe(args: &DescribeArgs) -> anyhow::Result<Vec<FieldSummary>> {
    let schema = load_schema(&args.schema)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;
    let changeset = define(schema.builders()?)?;
    Ok(changeset.config().values().map(FieldSummary::from).collect())
}

/// Execute the describe subcommand.
pub fn run_describe(args: &DescribeArgs) -> anyhow::Result<u8> {
    let summaries = describe(args)?;
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_lists_fields_with_input_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.yaml");
        std::fs::write(
            &path,
            "fields:\n  - key: price\n    type: float\n    default: 12.345\n  - key: name\n    label: Name\n    rules: [required]\n",
        )
        .unwrap();

        let summaries = describe(&DescribeArgs { schema: path }).unwrap();
        assert_eq!(summaries.len(), 2);

        let name = &summaries[0];
        assert_eq!(name.key, "name");
        assert_eq!(name.label, "Name");
        assert_eq!(name.field_type, "text");
        assert_eq!(name.validators, 1);

        let price = &summaries[1];
        assert_eq!(price.field_type, "float");
        assert_eq!(price.default, Value::from(12.345));
        assert_eq!(price.default_input, Value::from("12.345"));
    }

    #[test]
    fn test_describe_rejects_duplicate_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.yaml");
        std::fs::write(&path, "fields:\n  - key: a\n  - key: a\n").unwrap();
        let err = describe(&DescribeArgs { schema: path }).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate field: a"));
    }
}

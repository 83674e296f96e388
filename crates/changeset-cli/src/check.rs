//! # Check Subcommand
//!
//! Defines a changeset from a schema, optionally stages a JSON change file
//! and commits it, then prints the resulting snapshot. The exit code tells
//! CI whether the merged values pass validation.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use changeset_core::Value;
use changeset_state::{define, Changeset, Snapshot};

use crate::schema::{load_changes, load_schema};
use crate::EXIT_INVALID;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the YAML schema file.
    pub schema: PathBuf,

    /// JSON object of field key to pending value.
    #[arg(long)]
    pub changes: Option<PathBuf>,

    /// Treat change values as input representations and convert them with
    /// each field's from-input converter first.
    #[arg(long)]
    pub from_input: bool,

    /// Commit the staged changes before reporting.
    #[arg(long)]
    pub commit: bool,
}

/// Build the changeset described by `args`.
pub fn check(args: &CheckArgs) -> anyhow::Result<Changeset> {
    let schema = load_schema(&args.schema)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;
    let mut changeset = define(schema.builders()?)?;

    if let Some(path) = &args.changes {
        let raw = load_changes(path)
            .with_context(|| format!("loading changes {}", path.display()))?;
        let staged: Vec<(String, Value)> = raw
            .into_iter()
            .map(|(key, value)| {
                let value = match changeset.field(&key) {
                    Some(config) if args.from_input => {
                        let converted = config.from_input_value(&value);
                        tracing::debug!(
                            field = %key,
                            from = value.kind(),
                            to = converted.kind(),
                            "converted input value"
                        );
                        converted
                    }
                    _ => value,
                };
                (key, value)
            })
            .collect();
        changeset = changeset.change(staged)?;
        tracing::info!(changes = changeset.changes().len(), "staged changes");
    }

    if args.commit {
        changeset = changeset.commit();
        tracing::info!("committed changes");
    }

    Ok(changeset)
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<u8> {
    let changeset = check(args)?;
    let snapshot: Snapshot = changeset.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if snapshot.valid_values {
        Ok(0)
    } else {
        for (key, reason) in &snapshot.errors_for_values {
            tracing::warn!(field = %key, %reason, "validation failed");
        }
        Ok(EXIT_INVALID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const SCHEMA: &str = r#"
fields:
  - key: name
    rules: [required]
  - key: age
    type: number
    rules:
      - min: 18
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn args(schema: PathBuf, changes: Option<PathBuf>) -> CheckArgs {
        CheckArgs {
            schema,
            changes,
            from_input: false,
            commit: false,
        }
    }

    #[test]
    fn test_check_without_changes_reports_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        let cs = check(&args(schema.clone(), None)).unwrap();
        assert!(!cs.valid_values());
        assert_eq!(run_check(&args(schema, None)).unwrap(), EXIT_INVALID);
    }

    #[test]
    fn test_check_with_valid_changes_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        let changes = write(dir.path(), "changes.json", r#"{"name": "Ada", "age": 36}"#);
        let cs = check(&args(schema.clone(), Some(changes.clone()))).unwrap();
        assert!(cs.valid_values());
        assert!(!cs.valid_data());
        assert_eq!(run_check(&args(schema, Some(changes))).unwrap(), 0);
    }

    #[test]
    fn test_check_commit_promotes_changes() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        let changes = write(dir.path(), "changes.json", r#"{"name": "Ada", "age": 36}"#);
        let mut a = args(schema, Some(changes));
        a.commit = true;
        let cs = check(&a).unwrap();
        assert!(cs.changes().is_empty());
        assert_eq!(cs.data().get("age"), Some(&Value::from(36)));
        assert!(cs.valid_data());
    }

    #[test]
    fn test_check_from_input_parses_text() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        let changes = write(dir.path(), "changes.json", r#"{"age": "21"}"#);
        let mut a = args(schema, Some(changes));
        a.from_input = true;
        let cs = check(&a).unwrap();
        assert_eq!(cs.changes().get("age"), Some(&Value::from(21)));
        assert!(!cs.errors_for_changes().contains_key("age"));
    }

    #[test]
    fn test_check_rejects_unknown_field() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        let changes = write(dir.path(), "changes.json", r#"{"email": "a@b"}"#);
        let err = check(&args(schema, Some(changes))).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field: email"));
    }
}

use crate::normalize::{normalize, ManifestDialect, NormalizedEasystack};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse manifest: {0}")]
    Format(String),
    #[error("not a valid easystack file: no 'software' key found")]
    MissingSection,
    #[error("software name must not be empty")]
    EmptySoftwareName,
    #[error("toolchains for software '{software}' are not defined")]
    MissingToolchain { software: String },
    #[error("malformed versions for software '{software}': {reason}")]
    MalformedVersions { software: String, reason: String },
    #[error("easystack specification of '{software}' contains an asterisk, wildcards are not supported")]
    UnsupportedWildcard { software: String },
    #[error("labels are not supported by the legacy easystack format ({context})")]
    UnsupportedLabel { context: String },
    #[error("invalid value for '{key}' in {scope}: {reason}")]
    InvalidOption {
        scope: String,
        key: String,
        reason: String,
    },
}

impl ManifestError {
    pub(crate) fn malformed(software: &str, reason: impl Into<String>) -> Self {
        Self::MalformedVersions {
            software: software.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Decode manifest text into an untyped YAML tree whose root is a mapping.
pub fn decode_str(input: &str) -> Result<Mapping, ManifestError> {
    match serde_yaml::from_str::<Value>(input)? {
        Value::Mapping(root) => Ok(root),
        other => Err(ManifestError::Format(format!(
            "expected a mapping at the document root, found {}",
            describe(&other)
        ))),
    }
}

pub fn read_manifest_file(path: impl AsRef<Path>) -> Result<Mapping, ManifestError> {
    let content = fs::read_to_string(path)?;
    decode_str(&content)
}

pub fn parse_manifest_str(
    input: &str,
    dialect: ManifestDialect,
) -> Result<NormalizedEasystack, ManifestError> {
    normalize(&decode_str(input)?, dialect)
}

pub fn parse_manifest_file(
    path: impl AsRef<Path>,
    dialect: ManifestDialect,
) -> Result<NormalizedEasystack, ManifestError> {
    normalize(&read_manifest_file(path)?, dialect)
}

/// Stringify a YAML scalar the way a bare key or value reads in the manifest.
///
/// Returns `None` for null, sequences, mappings, and tagged values.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mapping_root() {
        let root = decode_str("software:\n  foo: {}\n").expect("should decode");
        assert!(root.contains_key("software"));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = decode_str("software: [unclosed").unwrap_err();
        assert!(matches!(err, ManifestError::ParseYaml(_)));
    }

    #[test]
    fn rejects_non_mapping_root() {
        let err = decode_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, ManifestError::Format(_)));
        assert!(err.to_string().contains("a sequence"));
    }

    #[test]
    fn rejects_empty_document() {
        assert!(decode_str("").is_err());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let input = "software: {}\nsoftware: {}\n";
        assert!(decode_str(input).is_err());
    }

    #[test]
    fn reads_manifest_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.yaml");
        std::fs::write(&path, "robot: true\n").unwrap();
        let root = read_manifest_file(&path).unwrap();
        assert_eq!(root.get("robot"), Some(&Value::Bool(true)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_manifest_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ManifestError::Io(_)));
    }

    #[test]
    fn scalars_stringify() {
        assert_eq!(
            scalar_to_string(&Value::String("gcc".into())).as_deref(),
            Some("gcc")
        );
        assert_eq!(scalar_to_string(&Value::from(2.24)).as_deref(), Some("2.24"));
        assert_eq!(scalar_to_string(&Value::from(3)).as_deref(), Some("3"));
        assert_eq!(scalar_to_string(&Value::Null), None);
    }
}

//! Classification of the `versions` field into one of its four admissible shapes.
//!
//! ```yaml
//! versions:            # Mapping: per-version overrides
//!   2.25:
//!   2.23:
//!     versionsuffix: '-R-4.0.0'
//!
//! versions: [2.24, 2.51]   # List
//!
//! versions:            # Words: a plain multi-line scalar
//!   2.24
//!   2.51
//!
//! versions: 2.24       # Single
//! ```

use crate::manifest::{describe, scalar_to_string, ManifestError};
use crate::normalize::ManifestDialect;
use crate::options::{read_bool, read_count, read_identifier, read_labels, TargetOptions};
use crate::options::{KEY_FROM_PR, KEY_PARALLEL, KEY_ROBOT};
use crate::types::LabelSet;
use serde_yaml::{Mapping, Value};

pub const KEY_VERSIONSUFFIX: &str = "versionsuffix";
/// Version-level label keys are spelled with hyphens, unlike the toolchain level.
pub const KEY_VERSION_INCLUDE_LABELS: &str = "include-labels";
pub const KEY_VERSION_EXCLUDE_LABELS: &str = "exclude-labels";

/// Overrides attached to one entry of a mapping-shaped `versions` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionOverrides {
    pub versionsuffix: Option<String>,
    /// `easybuild_version` is never set at this level.
    pub options: TargetOptions,
    pub include_labels: Option<LabelSet>,
    pub exclude_labels: Option<LabelSet>,
}

impl VersionOverrides {
    fn from_mapping(
        map: &Mapping,
        software: &str,
        dialect: ManifestDialect,
    ) -> Result<Self, ManifestError> {
        if dialect == ManifestDialect::Legacy
            && (map.contains_key(KEY_VERSION_INCLUDE_LABELS)
                || map.contains_key(KEY_VERSION_EXCLUDE_LABELS))
        {
            return Err(ManifestError::UnsupportedLabel {
                context: format!("software '{software}'"),
            });
        }

        let scope = format!("software '{software}'");
        Ok(Self {
            versionsuffix: read_identifier(map, KEY_VERSIONSUFFIX, &scope)?,
            options: TargetOptions {
                robot: read_bool(map, KEY_ROBOT, &scope)?,
                parallel: read_count(map, KEY_PARALLEL, &scope)?,
                easybuild_version: None,
                from_pr: read_identifier(map, KEY_FROM_PR, &scope)?,
            },
            include_labels: read_labels(map, KEY_VERSION_INCLUDE_LABELS, &scope)?,
            exclude_labels: read_labels(map, KEY_VERSION_EXCLUDE_LABELS, &scope)?,
        })
    }
}

/// The runtime shape of a `versions` field, decided once per toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionsSpec {
    /// Version → optional overrides; `None` for a bare `2.25:` entry.
    Mapping(Vec<(String, Option<VersionOverrides>)>),
    List(Vec<String>),
    Words(Vec<String>),
    Single(String),
}

impl VersionsSpec {
    pub fn classify(
        value: &Value,
        software: &str,
        dialect: ManifestDialect,
    ) -> Result<Self, ManifestError> {
        if contains_wildcard(value) {
            return Err(ManifestError::UnsupportedWildcard {
                software: software.to_owned(),
            });
        }
        if has_non_finite_version(value) {
            return Err(ManifestError::malformed(
                software,
                "versions must be finite numbers or strings",
            ));
        }

        let spec = match value {
            Value::Mapping(entries) => {
                let mut versions = Vec::with_capacity(entries.len());
                for (key, entry) in entries {
                    let version = scalar_to_string(key).ok_or_else(|| {
                        ManifestError::malformed(
                            software,
                            format!("version keys must be scalars, found {}", describe(key)),
                        )
                    })?;
                    let overrides = match entry {
                        Value::Null => None,
                        Value::Mapping(map) => {
                            Some(VersionOverrides::from_mapping(map, software, dialect)?)
                        }
                        other => {
                            return Err(ManifestError::malformed(
                                software,
                                format!(
                                    "version '{version}' must map to nothing or to a mapping, found {}",
                                    describe(other)
                                ),
                            ))
                        }
                    };
                    versions.push((version, overrides));
                }
                Self::Mapping(versions)
            }
            Value::Sequence(items) => Self::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(_) | Value::Number(_) => Ok(scalar_to_string(item)
                            .unwrap_or_default()),
                        other => Err(ManifestError::malformed(
                            software,
                            format!("version list entries must be scalars, found {}", describe(other)),
                        )),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            Value::String(s) => Self::Words(s.split_whitespace().map(str::to_owned).collect()),
            Value::Number(n) => Self::Single(n.to_string()),
            other => {
                return Err(ManifestError::malformed(
                    software,
                    format!("unsupported versions format: {}", describe(other)),
                ))
            }
        };

        if spec.is_empty() {
            return Err(ManifestError::malformed(software, "no versions listed"));
        }
        if spec.versions().any(str::is_empty) {
            return Err(ManifestError::malformed(software, "empty version string"));
        }
        Ok(spec)
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Mapping(entries) => entries.len(),
            Self::List(versions) | Self::Words(versions) => versions.len(),
            Self::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Version strings in declaration order.
    pub fn versions(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Mapping(entries) => Box::new(entries.iter().map(|(v, _)| v.as_str())),
            Self::List(versions) | Self::Words(versions) => {
                Box::new(versions.iter().map(String::as_str))
            }
            Self::Single(version) => Box::new(std::iter::once(version.as_str())),
        }
    }
}

/// Whether any string in the tree, key or value, contains `*`.
fn contains_wildcard(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains('*'),
        Value::Sequence(items) => items.iter().any(contains_wildcard),
        Value::Mapping(map) => map
            .iter()
            .any(|(k, v)| contains_wildcard(k) || contains_wildcard(v)),
        Value::Tagged(tagged) => contains_wildcard(&tagged.value),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Only version positions are inspected: mapping keys, list items and a bare number.
fn has_non_finite_version(value: &Value) -> bool {
    fn non_finite(value: &Value) -> bool {
        matches!(value, Value::Number(n) if n.as_f64().is_some_and(|f| !f.is_finite()))
    }
    match value {
        Value::Mapping(entries) => entries.keys().any(non_finite),
        Value::Sequence(items) => items.iter().any(non_finite),
        other => non_finite(other),
    }
}

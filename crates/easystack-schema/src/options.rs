//! Per-target build options and their typed extraction from manifest mappings.
//!
//! Every option is an `Option<T>`: `None` means "not specified here" and lets
//! the value fall through to the next level (version → toolchain → manifest),
//! while `Some(false)` / `Some(0)` are explicit values that stop inheritance.

use crate::manifest::{describe, scalar_to_string, ManifestError};
use crate::types::{Label, LabelSet};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

pub const KEY_ROBOT: &str = "robot";
pub const KEY_PARALLEL: &str = "parallel";
pub const KEY_EASYBUILD_VERSION: &str = "easybuild_version";
pub const KEY_FROM_PR: &str = "from_pr";

/// Execution hints attached to a build request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easybuild_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_pr: Option<String>,
}

impl TargetOptions {
    /// Read the manifest- or toolchain-level options from `map`.
    pub fn from_mapping(map: &Mapping, scope: &str) -> Result<Self, ManifestError> {
        Ok(Self {
            robot: read_bool(map, KEY_ROBOT, scope)?,
            parallel: read_count(map, KEY_PARALLEL, scope)?,
            easybuild_version: read_identifier(map, KEY_EASYBUILD_VERSION, scope)?,
            from_pr: read_identifier(map, KEY_FROM_PR, scope)?,
        })
    }

    /// Fill every unset field from `fallback`.
    #[must_use]
    pub fn or(self, fallback: &TargetOptions) -> Self {
        Self {
            robot: self.robot.or(fallback.robot),
            parallel: self.parallel.or(fallback.parallel),
            easybuild_version: self
                .easybuild_version
                .or_else(|| fallback.easybuild_version.clone()),
            from_pr: self.from_pr.or_else(|| fallback.from_pr.clone()),
        }
    }

    /// Whether no option is specified at all.
    pub fn is_empty(&self) -> bool {
        self.robot.is_none()
            && self.parallel.is_none()
            && self.easybuild_version.is_none()
            && self.from_pr.is_none()
    }

    /// Whether any option carries a value other than an explicit "off".
    pub fn has_effective_value(&self) -> bool {
        self.robot == Some(true)
            || self.parallel.is_some_and(|n| n != 0)
            || self
                .easybuild_version
                .as_deref()
                .is_some_and(|v| !v.is_empty())
            || self.from_pr.as_deref().is_some_and(|v| !v.is_empty())
    }
}

fn invalid(scope: &str, key: &str, reason: impl Into<String>) -> ManifestError {
    ManifestError::InvalidOption {
        scope: scope.to_owned(),
        key: key.to_owned(),
        reason: reason.into(),
    }
}

fn lookup<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

pub(crate) fn read_bool(
    map: &Mapping,
    key: &str,
    scope: &str,
) -> Result<Option<bool>, ManifestError> {
    match lookup(map, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(invalid(
            scope,
            key,
            format!("expected a boolean, found {}", describe(other)),
        )),
    }
}

pub(crate) fn read_count(
    map: &Mapping,
    key: &str,
    scope: &str,
) -> Result<Option<u32>, ManifestError> {
    match lookup(map, key) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(scope, key, format!("expected a non-negative integer, found {n}"))),
        Some(other) => Err(invalid(
            scope,
            key,
            format!("expected a non-negative integer, found {}", describe(other)),
        )),
    }
}

/// Read a string-or-number value such as a version or a pull request number.
pub(crate) fn read_identifier(
    map: &Mapping,
    key: &str,
    scope: &str,
) -> Result<Option<String>, ManifestError> {
    match lookup(map, key) {
        None => Ok(None),
        Some(v @ (Value::String(_) | Value::Number(_))) => Ok(scalar_to_string(v)),
        Some(other) => Err(invalid(
            scope,
            key,
            format!("expected a string or number, found {}", describe(other)),
        )),
    }
}

/// Read a label list: either a whitespace-separated string or a sequence of scalars.
///
/// An explicitly empty list yields `Some(empty)` so it still overrides the
/// inherited labels.
pub(crate) fn read_labels(
    map: &Mapping,
    key: &str,
    scope: &str,
) -> Result<Option<LabelSet>, ManifestError> {
    match lookup(map, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.split_whitespace().map(Label::from).collect())),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| {
                scalar_to_string(item).map(Label::new).ok_or_else(|| {
                    invalid(
                        scope,
                        key,
                        format!("labels must be scalars, found {}", describe(item)),
                    )
                })
            })
            .collect::<Result<LabelSet, _>>()
            .map(Some),
        Some(other) => Err(invalid(
            scope,
            key,
            format!(
                "expected a string or a sequence of labels, found {}",
                describe(other)
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::label_set;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn reads_all_options() {
        let map = mapping("robot: true\nparallel: 8\neasybuild_version: 4.3\nfrom_pr: 1234\n");
        let opts = TargetOptions::from_mapping(&map, "the manifest root").unwrap();
        assert_eq!(opts.robot, Some(true));
        assert_eq!(opts.parallel, Some(8));
        assert_eq!(opts.easybuild_version.as_deref(), Some("4.3"));
        assert_eq!(opts.from_pr.as_deref(), Some("1234"));
    }

    #[test]
    fn absent_and_null_options_are_unset() {
        let map = mapping("robot: ~\n");
        let opts = TargetOptions::from_mapping(&map, "the manifest root").unwrap();
        assert!(opts.is_empty());
    }

    #[test]
    fn explicit_false_is_kept_distinct_from_unset() {
        let version_level = TargetOptions {
            robot: Some(false),
            ..TargetOptions::default()
        };
        let toolchain_level = TargetOptions {
            robot: Some(true),
            parallel: Some(4),
            ..TargetOptions::default()
        };
        let merged = version_level.or(&toolchain_level);
        assert_eq!(merged.robot, Some(false));
        assert_eq!(merged.parallel, Some(4));
    }

    #[test]
    fn effective_value_ignores_explicit_off() {
        let off = TargetOptions {
            robot: Some(false),
            parallel: Some(0),
            easybuild_version: Some(String::new()),
            from_pr: None,
        };
        assert!(!off.is_empty());
        assert!(!off.has_effective_value());

        let on = TargetOptions {
            parallel: Some(2),
            ..TargetOptions::default()
        };
        assert!(on.has_effective_value());
    }

    #[test]
    fn rejects_wrongly_typed_robot() {
        let map = mapping("robot: yes please\n");
        let err = TargetOptions::from_mapping(&map, "the manifest root").unwrap_err();
        assert!(matches!(err, ManifestError::InvalidOption { ref key, .. } if key == "robot"));
    }

    #[test]
    fn yaml_1_1_booleans_are_strings() {
        for word in ["yes", "no", "on", "off"] {
            let map = mapping(&format!("robot: {word}\n"));
            let err = TargetOptions::from_mapping(&map, "the manifest root").unwrap_err();
            assert!(err.to_string().contains("expected a boolean"), "{word}: {err}");
        }
    }

    #[test]
    fn rejects_negative_parallel() {
        let map = mapping("parallel: -2\n");
        assert!(TargetOptions::from_mapping(&map, "the manifest root").is_err());
    }

    #[test]
    fn reads_labels_from_string_and_sequence() {
        let map = mapping("a: gpu cuda\nb: [gpu, 2]\nc: []\n");
        assert_eq!(
            read_labels(&map, "a", "x").unwrap(),
            Some(label_set(["cuda", "gpu"]))
        );
        assert_eq!(
            read_labels(&map, "b", "x").unwrap(),
            Some(label_set(["2", "gpu"]))
        );
        assert_eq!(read_labels(&map, "c", "x").unwrap(), Some(LabelSet::new()));
        assert_eq!(read_labels(&map, "d", "x").unwrap(), None);
    }

    #[test]
    fn rejects_nested_labels() {
        let map = mapping("a: [[gpu]]\n");
        assert!(read_labels(&map, "a", "x").is_err());
    }
}

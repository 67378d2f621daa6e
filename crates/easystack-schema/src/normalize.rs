use crate::manifest::{describe, scalar_to_string, ManifestError};
use crate::options::{read_identifier, read_labels, TargetOptions};
use crate::request::{BuildRequest, BuildRequestSet};
use crate::types::LabelSet;
use crate::versions::{VersionsSpec, KEY_VERSIONSUFFIX};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;

pub const KEY_SOFTWARE: &str = "software";
pub const KEY_TOOLCHAINS: &str = "toolchains";
pub const KEY_VERSIONS: &str = "versions";
pub const KEY_TOOLCHAIN_INCLUDE_LABELS: &str = "include_labels";
pub const KEY_TOOLCHAIN_EXCLUDE_LABELS: &str = "exclude_labels";

/// Which generation of the easystack format a manifest is read as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestDialect {
    /// Current format: labels allowed at toolchain and version level.
    #[default]
    Labelled,
    /// Format predating labels; any label key is an error.
    Legacy,
}

impl fmt::Display for ManifestDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Labelled => f.write_str("labelled"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// How the caller should consume the resolved targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Hand the target list to the build engine.
    #[default]
    Enumerate,
    /// Print the equivalent invocation commands for the operator to run.
    PrintCommandsOnly,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enumerate => f.write_str("enumerate"),
            Self::PrintCommandsOnly => f.write_str("print_commands_only"),
        }
    }
}

/// Canonical form of a parsed easystack: ordered requests plus the execution mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEasystack {
    pub requests: BuildRequestSet,
    pub mode: ExecutionMode,
}

/// Toolchain key split on its first hyphen: `gcc-1.2.3` → `("gcc", "1.2.3")`.
pub fn split_toolchain(spec: &str) -> (String, String) {
    match spec.split_once('-') {
        Some((name, version)) => (name.to_owned(), version.to_owned()),
        None => (spec.to_owned(), String::new()),
    }
}

/// Walk a decoded manifest and emit one build request per (software, toolchain, version).
///
/// Options inherit version → toolchain → manifest. The execution mode is
/// `PrintCommandsOnly` whenever the manifest or any toolchain declares a
/// non-false `robot`, `parallel`, `easybuild_version` or `from_pr`, whatever
/// the shape of the `versions` fields.
#[allow(clippy::too_many_lines)]
pub fn normalize(
    root: &Mapping,
    dialect: ManifestDialect,
) -> Result<NormalizedEasystack, ManifestError> {
    let software = match root.get(KEY_SOFTWARE) {
        None => return Err(ManifestError::MissingSection),
        Some(Value::Mapping(software)) => software,
        Some(other) => {
            return Err(ManifestError::Format(format!(
                "'{KEY_SOFTWARE}' must be a mapping, found {}",
                describe(other)
            )))
        }
    };

    let defaults = TargetOptions::from_mapping(root, "the manifest root")?;
    let mut print_commands = defaults.has_effective_value();
    let mut requests = BuildRequestSet::new(defaults.clone(), Vec::new());

    for (name_key, entry) in software {
        let name = scalar_to_string(name_key).ok_or_else(|| {
            ManifestError::Format(format!(
                "software names must be scalars, found {}",
                describe(name_key)
            ))
        })?;
        if name.trim().is_empty() {
            return Err(ManifestError::EmptySoftwareName);
        }

        let toolchains = match entry.get(KEY_TOOLCHAINS) {
            None => return Err(ManifestError::MissingToolchain { software: name }),
            Some(Value::Mapping(toolchains)) => toolchains,
            Some(other) => {
                return Err(ManifestError::malformed(
                    &name,
                    format!("'{KEY_TOOLCHAINS}' must be a mapping, found {}", describe(other)),
                ))
            }
        };

        for (toolchain_key, toolchain_entry) in toolchains {
            let toolchain = scalar_to_string(toolchain_key).ok_or_else(|| {
                ManifestError::malformed(
                    &name,
                    format!("toolchain keys must be scalars, found {}", describe(toolchain_key)),
                )
            })?;
            let Value::Mapping(toolchain_map) = toolchain_entry else {
                return Err(ManifestError::malformed(
                    &name,
                    format!(
                        "toolchain '{toolchain}' must be a mapping, found {}",
                        describe(toolchain_entry)
                    ),
                ));
            };
            let Some(versions) = toolchain_map.get(KEY_VERSIONS) else {
                return Err(ManifestError::malformed(
                    &name,
                    format!("no '{KEY_VERSIONS}' key under toolchain '{toolchain}'"),
                ));
            };

            let spec = VersionsSpec::classify(versions, &name, dialect)?;

            let scope = format!("software '{name}'");
            let toolchain_options =
                TargetOptions::from_mapping(toolchain_map, &scope)?.or(&defaults);
            print_commands |= toolchain_options.has_effective_value();
            let toolchain_suffix = read_identifier(toolchain_map, KEY_VERSIONSUFFIX, &scope)?;
            let (include_labels, exclude_labels) =
                read_toolchain_labels(toolchain_map, &name, dialect)?;

            let (toolchain_name, toolchain_version) = split_toolchain(&toolchain);
            let request = |version: &str| BuildRequest {
                name: name.clone(),
                version: version.to_owned(),
                versionsuffix: toolchain_suffix.clone(),
                toolchain_name: toolchain_name.clone(),
                toolchain_version: toolchain_version.clone(),
                options: toolchain_options.clone(),
                include_labels: include_labels.clone(),
                exclude_labels: exclude_labels.clone(),
            };

            match spec {
                VersionsSpec::Mapping(entries) => {
                    for (version, overrides) in entries {
                        let mut req = request(&version);
                        match overrides {
                            // A bare version key never carries a suffix.
                            None => req.versionsuffix = None,
                            Some(overrides) => {
                                req.versionsuffix = overrides
                                    .versionsuffix
                                    .or_else(|| toolchain_suffix.clone());
                                req.options = overrides.options.or(&toolchain_options);
                                if let Some(labels) = overrides.include_labels {
                                    req.include_labels = labels;
                                }
                                if let Some(labels) = overrides.exclude_labels {
                                    req.exclude_labels = labels;
                                }
                            }
                        }
                        requests.push(req);
                    }
                }
                VersionsSpec::List(versions) | VersionsSpec::Words(versions) => {
                    for version in &versions {
                        requests.push(request(version));
                    }
                }
                VersionsSpec::Single(version) => requests.push(request(&version)),
            }
        }
    }

    let mode = if print_commands {
        ExecutionMode::PrintCommandsOnly
    } else {
        ExecutionMode::Enumerate
    };
    Ok(NormalizedEasystack { requests, mode })
}

fn read_toolchain_labels(
    toolchain: &Mapping,
    software: &str,
    dialect: ManifestDialect,
) -> Result<(LabelSet, LabelSet), ManifestError> {
    if dialect == ManifestDialect::Legacy {
        if toolchain.contains_key(KEY_TOOLCHAIN_INCLUDE_LABELS)
            || toolchain.contains_key(KEY_TOOLCHAIN_EXCLUDE_LABELS)
        {
            return Err(ManifestError::UnsupportedLabel {
                context: format!("software '{software}'"),
            });
        }
        return Ok((LabelSet::new(), LabelSet::new()));
    }

    let scope = format!("software '{software}'");
    Ok((
        read_labels(toolchain, KEY_TOOLCHAIN_INCLUDE_LABELS, &scope)?.unwrap_or_default(),
        read_labels(toolchain, KEY_TOOLCHAIN_EXCLUDE_LABELS, &scope)?.unwrap_or_default(),
    ))
}

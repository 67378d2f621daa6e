use crate::config::PlannerConfig;
use crate::CoreError;
use easystack_schema::{
    label_set, parse_manifest_file, BuildRequestSet, ExecutionMode, LabelFilter,
    ManifestDialect, ManifestError, NormalizedEasystack, TargetId, TargetOptions,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Invocation-level inputs to [`parse_easystack`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOptions {
    pub dialect: ManifestDialect,
    pub labels: LabelFilter,
}

impl PlanOptions {
    pub fn new(dialect: ManifestDialect) -> Self {
        Self {
            dialect,
            labels: LabelFilter::default(),
        }
    }

    #[must_use]
    pub fn with_labels<I, E, S>(mut self, include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = LabelFilter::new(label_set(include), label_set(exclude));
        self
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.dialect).with_labels(
            config.include_labels.iter().map(String::as_str),
            config.exclude_labels.iter().map(String::as_str),
        )
    }
}

/// Everything a caller needs to act on a parsed easystack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EasystackPlan {
    /// Easyconfig file names in manifest declaration order.
    pub targets: Vec<TargetId>,
    pub mode: ExecutionMode,
    /// Manifest-level options, identical for both dialects.
    pub general_options: TargetOptions,
    #[serde(skip)]
    pub requests: BuildRequestSet,
}

impl EasystackPlan {
    /// Apply the invocation's label filter and compose the target list.
    pub fn from_normalized(normalized: NormalizedEasystack, labels: &LabelFilter) -> Self {
        let total = normalized.requests.len();
        let requests = labels.apply(normalized.requests);
        if requests.len() < total {
            debug!(
                "label filter dropped {} of {total} build requests",
                total - requests.len()
            );
        }
        Self {
            targets: requests.compose_target_identifiers(),
            mode: normalized.mode,
            general_options: requests.defaults().clone(),
            requests,
        }
    }

    pub fn is_print_only(&self) -> bool {
        self.mode == ExecutionMode::PrintCommandsOnly
    }

    /// Invocation lines the operator can run by hand, one per target.
    pub fn render_commands(&self, command: &str) -> Vec<String> {
        self.requests.render_invocation_commands(command)
    }
}

/// Read, normalize, and filter the easystack at `path`.
///
/// Nothing is printed here; callers decide whether to render commands based
/// on [`EasystackPlan::mode`].
pub fn parse_easystack(path: &Path, options: &PlanOptions) -> Result<EasystackPlan, CoreError> {
    info!("building from easystack: {}", path.display());

    if options.dialect == ManifestDialect::Legacy && !options.labels.is_empty() {
        return Err(ManifestError::UnsupportedLabel {
            context: "include/exclude labels were given for the invocation".to_owned(),
        }
        .into());
    }

    let normalized = parse_manifest_file(path, options.dialect)?;
    let plan = EasystackPlan::from_normalized(normalized, &options.labels);

    debug!(
        "easystack parsed, proceeding to install these easyconfigs:\n{}",
        plan.targets
            .iter()
            .map(TargetId::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    );
    if plan.general_options.is_empty() {
        debug!("no general options were specified in easystack");
    } else {
        debug!(
            "general options for installation are: {:?}",
            plan.general_options
        );
    }
    if plan.is_print_only() {
        info!("easystack declares global build options, invocation commands will be printed instead");
    }
    info!(
        "resolved {} easyconfig target(s) from {}",
        plan.targets.len(),
        path.display()
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_config_carry_labels() {
        let config = PlannerConfig {
            include_labels: vec!["gpu".to_owned()],
            exclude_labels: vec!["old".to_owned(), "old".to_owned()],
            ..PlannerConfig::default()
        };
        let options = PlanOptions::from_config(&config);
        assert_eq!(options.dialect, ManifestDialect::Labelled);
        assert_eq!(options.labels.include, label_set(["gpu"]));
        assert_eq!(options.labels.exclude, label_set(["old"]));
    }

    #[test]
    fn plan_serializes_without_requests() {
        let plan = EasystackPlan {
            targets: vec![TargetId::new("zlib-1.2.11.eb")],
            mode: ExecutionMode::Enumerate,
            general_options: TargetOptions::default(),
            requests: BuildRequestSet::default(),
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["targets"][0], "zlib-1.2.11.eb");
        assert_eq!(json["mode"], "enumerate");
        assert!(json.get("requests").is_none());
    }
}

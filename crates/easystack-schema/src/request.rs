use crate::full_version::compute_full_version;
use crate::options::TargetOptions;
use crate::types::{LabelSet, TargetId};
use serde::{Deserialize, Serialize};

/// Default build-engine command used when rendering invocation lines.
pub const DEFAULT_COMMAND: &str = "eb";

/// One fully resolved build target: software, toolchain, version, and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versionsuffix: Option<String>,
    pub toolchain_name: String,
    pub toolchain_version: String,
    #[serde(default)]
    pub options: TargetOptions,
    #[serde(default, skip_serializing_if = "LabelSet::is_empty")]
    pub include_labels: LabelSet,
    #[serde(default, skip_serializing_if = "LabelSet::is_empty")]
    pub exclude_labels: LabelSet,
}

impl BuildRequest {
    pub fn full_version(&self) -> String {
        compute_full_version(
            &self.toolchain_name,
            &self.toolchain_version,
            &self.version,
            self.versionsuffix.as_deref(),
        )
    }

    /// Easyconfig file name, `<name>-<full version>.eb`.
    pub fn target_id(&self) -> TargetId {
        TargetId::new(format!("{}-{}.eb", self.name, self.full_version()))
    }

    /// Shell line that builds this target with `command`, carrying the set options.
    pub fn invocation_command(&self, command: &str) -> String {
        let mut line = String::new();
        if let Some(eb_version) = self
            .options
            .easybuild_version
            .as_deref()
            .filter(|v| !v.is_empty())
        {
            line.push_str(&format!("module load EasyBuild/{eb_version} && "));
        }
        line.push_str(command);
        line.push(' ');
        line.push_str(&self.target_id());
        if self.options.robot == Some(true) {
            line.push_str(" --robot");
        }
        if let Some(n) = self.options.parallel.filter(|&n| n != 0) {
            line.push_str(&format!(" --parallel={n}"));
        }
        if let Some(pr) = self.options.from_pr.as_deref().filter(|v| !v.is_empty()) {
            line.push_str(&format!(" --from-pr={pr}"));
        }
        line
    }
}

/// Ordered build requests in manifest declaration order, plus manifest-level defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequestSet {
    requests: Vec<BuildRequest>,
    defaults: TargetOptions,
}

impl BuildRequestSet {
    pub fn new(defaults: TargetOptions, requests: Vec<BuildRequest>) -> Self {
        Self { requests, defaults }
    }

    pub(crate) fn push(&mut self, request: BuildRequest) {
        self.requests.push(request);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BuildRequest> {
        self.requests.iter()
    }

    pub fn requests(&self) -> &[BuildRequest] {
        &self.requests
    }

    /// Manifest-level options every request inherited from.
    pub fn defaults(&self) -> &TargetOptions {
        &self.defaults
    }

    /// Build a new set holding only the requests accepted by `keep`, in order.
    #[must_use]
    pub fn filtered(self, keep: impl FnMut(&BuildRequest) -> bool) -> Self {
        let requests = self.requests.into_iter().filter(keep).collect();
        Self {
            requests,
            defaults: self.defaults,
        }
    }

    pub fn compose_target_identifiers(&self) -> Vec<TargetId> {
        self.requests.iter().map(BuildRequest::target_id).collect()
    }

    pub fn render_invocation_commands(&self, command: &str) -> Vec<String> {
        self.requests
            .iter()
            .map(|r| r.invocation_command(command))
            .collect()
    }
}

impl IntoIterator for BuildRequestSet {
    type Item = BuildRequest;
    type IntoIter = std::vec::IntoIter<BuildRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

/// Collects requests with no manifest-level defaults.
impl FromIterator<BuildRequest> for BuildRequestSet {
    fn from_iter<I: IntoIterator<Item = BuildRequest>>(iter: I) -> Self {
        Self::new(TargetOptions::default(), iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BuildRequestSet {
    type Item = &'a BuildRequest;
    type IntoIter = std::slice::Iter<'a, BuildRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}

//! Label-based pruning of a [`BuildRequestSet`].
//!
//! Filters consume the set and build a new one in the same order; nothing is
//! removed from a sequence while it is being walked.

use crate::request::{BuildRequest, BuildRequestSet};
use crate::types::LabelSet;
use serde::{Deserialize, Serialize};

/// Keep a request unless it requires include labels and none of them was provided.
pub fn apply_include(set: BuildRequestSet, provided: &LabelSet) -> BuildRequestSet {
    set.filtered(|r| is_included(r, provided))
}

/// Drop a request when any of its exclude labels was provided.
pub fn apply_exclude(set: BuildRequestSet, provided: &LabelSet) -> BuildRequestSet {
    set.filtered(|r| !is_excluded(r, provided))
}

fn is_included(request: &BuildRequest, provided: &LabelSet) -> bool {
    request.include_labels.is_empty() || !request.include_labels.is_disjoint(provided)
}

fn is_excluded(request: &BuildRequest, provided: &LabelSet) -> bool {
    !request.exclude_labels.is_disjoint(provided)
}

/// Labels supplied on an invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFilter {
    #[serde(default)]
    pub include: LabelSet,
    #[serde(default)]
    pub exclude: LabelSet,
}

impl LabelFilter {
    pub fn new(include: LabelSet, exclude: LabelSet) -> Self {
        Self { include, exclude }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Apply the include rule, then the exclude rule.
    pub fn apply(&self, set: BuildRequestSet) -> BuildRequestSet {
        apply_exclude(apply_include(set, &self.include), &self.exclude)
    }
}

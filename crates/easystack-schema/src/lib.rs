//! Easystack manifest decoding, normalization, and target composition.
//!
//! This crate defines the schema layer: YAML decoding into an untyped tree
//! (`decode_str`), normalization of the four `versions` shapes into ordered
//! `BuildRequest`s with inherited options (`normalize`), label filtering
//! (`LabelFilter`), and easyconfig file name composition
//! (`compute_full_version`, `BuildRequestSet::compose_target_identifiers`).

pub mod filter;
pub mod full_version;
pub mod manifest;
pub mod normalize;
pub mod options;
pub mod request;
pub mod types;
pub mod versions;

pub use filter::{apply_exclude, apply_include, LabelFilter};
pub use full_version::{compute_full_version, is_system_toolchain, SYSTEM_TOOLCHAIN_NAME};
pub use manifest::{
    decode_str, parse_manifest_file, parse_manifest_str, read_manifest_file, ManifestError,
};
pub use normalize::{
    normalize, split_toolchain, ExecutionMode, ManifestDialect, NormalizedEasystack,
};
pub use options::TargetOptions;
pub use request::{BuildRequest, BuildRequestSet, DEFAULT_COMMAND};
pub use types::{label_set, Label, LabelSet, TargetId};
pub use versions::{VersionOverrides, VersionsSpec};

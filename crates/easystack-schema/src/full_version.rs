/// Name of the toolchain that builds with the host system compiler.
pub const SYSTEM_TOOLCHAIN_NAME: &str = "system";

/// Older spelling of [`SYSTEM_TOOLCHAIN_NAME`], still accepted in manifests.
pub const DUMMY_TOOLCHAIN_NAME: &str = "dummy";

pub fn is_system_toolchain(name: &str) -> bool {
    name == SYSTEM_TOOLCHAIN_NAME || name == DUMMY_TOOLCHAIN_NAME
}

/// Compose the full easyconfig version: `<version>[-<tc name>[-<tc version>]]<suffix>`.
///
/// The system toolchain contributes nothing to the full version.
pub fn compute_full_version(
    toolchain_name: &str,
    toolchain_version: &str,
    version: &str,
    versionsuffix: Option<&str>,
) -> String {
    let mut full = version.to_owned();
    if !is_system_toolchain(toolchain_name) {
        full.push('-');
        full.push_str(toolchain_name);
        if !toolchain_version.is_empty() {
            full.push('-');
            full.push_str(toolchain_version);
        }
    }
    if let Some(suffix) = versionsuffix {
        full.push_str(suffix);
    }
    full
}

pub mod check;
pub mod completions;
pub mod man_pages;
pub mod print;
pub mod targets;

use crate::ManifestArgs;
use easystack_core::{parse_easystack, EasystackPlan, PlanOptions, PlannerConfig};
use easystack_schema::{label_set, ExecutionMode, ManifestDialect};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_CONFIG_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn colorize_mode(mode: ExecutionMode) -> String {
    use console::Style;
    let text = mode.to_string();
    match mode {
        ExecutionMode::Enumerate => Style::new().green().apply_to(text).to_string(),
        ExecutionMode::PrintCommandsOnly => Style::new().yellow().bold().apply_to(text).to_string(),
    }
}

/// Command-line labels win over config labels; `--legacy` wins over the config dialect.
pub fn plan_options(config: &PlannerConfig, args: &ManifestArgs) -> PlanOptions {
    let mut options = PlanOptions::from_config(config);
    if args.legacy {
        options.dialect = ManifestDialect::Legacy;
    }
    if !args.include_labels.is_empty() {
        options.labels.include = label_set(args.include_labels.iter().map(String::as_str));
    }
    if !args.exclude_labels.is_empty() {
        options.labels.exclude = label_set(args.exclude_labels.iter().map(String::as_str));
    }
    options
}

pub fn load_plan(config: &PlannerConfig, args: &ManifestArgs) -> Result<EasystackPlan, String> {
    parse_easystack(&args.manifest, &plan_options(config, args)).map_err(|e| e.to_string())
}

pub fn resolve_command(config: &PlannerConfig, flag: Option<&str>) -> String {
    flag.map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(&config.command)
        .to_owned()
}

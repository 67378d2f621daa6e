use super::{colorize_mode, json_pretty, load_plan, plan_options, EXIT_SUCCESS};
use crate::ManifestArgs;
use easystack_core::PlannerConfig;

pub fn run(config: &PlannerConfig, args: &ManifestArgs, json: bool) -> Result<u8, String> {
    let plan = load_plan(config, args)?;
    let dialect = plan_options(config, args).dialect;
    if json {
        let payload = serde_json::json!({
            "manifest": args.manifest,
            "valid": true,
            "dialect": dialect,
            "mode": plan.mode,
            "targets": plan.targets.len(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "{}: valid {dialect} easystack, {} target(s), mode {}",
            args.manifest.display(),
            plan.targets.len(),
            colorize_mode(plan.mode)
        );
    }
    Ok(EXIT_SUCCESS)
}

use super::{json_pretty, load_plan, resolve_command, EXIT_SUCCESS};
use crate::ManifestArgs;
use easystack_core::PlannerConfig;

pub fn run(
    config: &PlannerConfig,
    args: &ManifestArgs,
    command: Option<&str>,
    json: bool,
) -> Result<u8, String> {
    let plan = load_plan(config, args)?;
    let lines = plan.render_commands(&resolve_command(config, command));
    if json {
        let payload = serde_json::json!({
            "mode": plan.mode,
            "commands": lines,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        for line in &lines {
            println!("{line}");
        }
    }
    Ok(EXIT_SUCCESS)
}

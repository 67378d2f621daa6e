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
    let command = resolve_command(config, command);
    let commands = plan
        .is_print_only()
        .then(|| plan.render_commands(&command));

    if json {
        let payload = serde_json::json!({
            "manifest": args.manifest,
            "mode": plan.mode,
            "targets": plan.targets,
            "general_options": plan.general_options,
            "commands": commands,
        });
        println!("{}", json_pretty(&payload)?);
    } else if let Some(lines) = commands {
        eprintln!("note: easystack sets global build options, run these commands instead:");
        for line in lines {
            println!("{line}");
        }
    } else {
        for target in &plan.targets {
            println!("{target}");
        }
    }
    Ok(EXIT_SUCCESS)
}

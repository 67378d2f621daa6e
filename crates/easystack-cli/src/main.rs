mod commands;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_MANIFEST_ERROR};
use easystack_core::{CoreError, PlannerConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "easystack",
    version,
    about = "Plan EasyBuild installations from an easystack file"
)]
struct Cli {
    /// Planner config file (defaults to ~/.config/easystack/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
pub struct ManifestArgs {
    /// Path to the easystack YAML file.
    #[arg(default_value = "easystack.yaml")]
    manifest: PathBuf,
    /// Keep labelled targets only if they carry one of these labels (comma-separated, repeatable).
    #[arg(long = "include-labels", value_delimiter = ',')]
    include_labels: Vec<String>,
    /// Drop targets carrying any of these labels (comma-separated, repeatable).
    #[arg(long = "exclude-labels", value_delimiter = ',')]
    exclude_labels: Vec<String>,
    /// Read the manifest in the legacy format that predates labels.
    #[arg(long, default_value_t = false)]
    legacy: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the easyconfig files to install, in manifest order.
    Targets {
        #[command(flatten)]
        args: ManifestArgs,
        /// Build command used when the manifest switches to printing invocations.
        #[arg(long)]
        command: Option<String>,
    },
    /// Print one build invocation per target.
    #[command(name = "commands")]
    PrintCommands {
        #[command(flatten)]
        args: ManifestArgs,
        /// Build command to invoke (overrides config file).
        #[arg(long)]
        command: Option<String>,
    },
    /// Validate an easystack file and summarize it.
    Check {
        #[command(flatten)]
        args: ManifestArgs,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("EASYSTACK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Targets { args, command } => load_config(config_path).and_then(|config| {
            commands::targets::run(&config, &args, command.as_deref(), json_output)
        }),
        Commands::PrintCommands { args, command } => {
            load_config(config_path).and_then(|config| {
                commands::print::run(&config, &args, command.as_deref(), json_output)
            })
        }
        Commands::Check { args } => load_config(config_path)
            .and_then(|config| commands::check::run(&config, &args, json_output)),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:") {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("config error:") {
                EXIT_CONFIG_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig, String> {
    let config = match path {
        Some(p) => PlannerConfig::load(p),
        None => PlannerConfig::load_default(),
    }
    .map_err(|e| match e {
        CoreError::Config(msg) => format!("config error: {msg}"),
        other => format!("config error: {other}"),
    })?;
    debug!(
        "planner config: dialect={}, command={}",
        config.dialect, config.command
    );
    Ok(config)
}

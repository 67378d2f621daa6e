use crate::CoreError;
use easystack_schema::{ManifestDialect, DEFAULT_COMMAND};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-user planner defaults, read from `~/.config/easystack/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub dialect: ManifestDialect,
    /// Build-engine command used when rendering invocation lines.
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default)]
    pub include_labels: Vec<String>,
    #[serde(default)]
    pub exclude_labels: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            dialect: ManifestDialect::default(),
            command: default_command(),
            include_labels: Vec::new(),
            exclude_labels: Vec::new(),
        }
    }
}

impl PlannerConfig {
    #[must_use]
    pub fn with_command(mut self, command: &str) -> Self {
        command.trim().clone_into(&mut self.command);
        self
    }

    /// Load `~/.config/easystack/config.json`, or defaults if it does not exist.
    pub fn load_default() -> Result<Self, CoreError> {
        let path = default_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| CoreError::Config(format!("invalid config {}: {e}", path.display())))?;
        if config.command.trim().is_empty() {
            return Err(CoreError::Config(format!(
                "invalid config {}: command must not be empty",
                path.display()
            )));
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn default_command() -> String {
    DEFAULT_COMMAND.to_owned()
}

pub fn default_config_path() -> Result<PathBuf, CoreError> {
    let home = std::env::var("HOME").map_err(|_| CoreError::Config("HOME not set".to_owned()))?;
    Ok(PathBuf::from(home).join(".config/easystack/config.json"))
}

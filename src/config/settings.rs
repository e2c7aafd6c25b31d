use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub agent: AgentConfig,
}

/// Chat-completion endpoint used by the agent loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Assistant replies starting with this end the loop
    #[serde(default = "default_completion_marker")]
    pub completion_marker: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_provider() -> String {
    "openai_compatible".to_string()
}
fn default_api_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}
fn default_model() -> String {
    "gpt-4o".to_string()
}
fn default_max_iterations() -> usize {
    10
}
fn default_completion_marker() -> String {
    "DONE:".to_string()
}
fn default_system_prompt() -> String {
    "You are an autonomous agent that completes tasks step by step.\n\n\
Think through problems carefully. Use tools when needed. When the task is complete, \
respond with DONE: followed by a summary of what you accomplished."
        .to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            api_key_env: default_api_key_env(),
            base_url: None,
            model: default_model(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            completion_marker: default_completion_marker(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default config location.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Self::resolve_path(path)?;

        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            if path.is_some() {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Ok(Settings::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// The file `load` reads: the explicit path if given, else the default
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(p.to_path_buf()),
            None => Self::config_path(),
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("dev", "planguard", "planguard")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Inline key first, then the configured environment variable
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(key) = &self.model.api_key {
            return Some(key.clone());
        }
        if let Some(env_var) = &self.model.api_key_env {
            return std::env::var(env_var).ok();
        }
        None
    }

    /// TOML rendering with any inline key masked
    pub fn to_display_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.model.api_key.is_some() {
            shown.model.api_key = Some("********".to_string());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

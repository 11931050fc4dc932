use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EfError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub finder: FinderConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(std::path::PathBuf::from)
            .or_else(|| std::env::var("EF_CONFIG").ok().map(std::path::PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else if let Some(patch) = Self::load_patch(&root.join("config.toml"))? {
            config.merge_patch(patch);
        }

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|err| EfError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| EfError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.finder {
            self.finder.merge(patch);
        }
        if let Some(patch) = patch.llm {
            self.llm.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_usize("EF_MAX_RECOMMENDATIONS")? {
            self.finder.max_recommendations = value;
        }
        if let Some(value) = env_usize("EF_FULLTEXT_BACKSTOP_BELOW")? {
            self.finder.fulltext_backstop_below = value;
        }

        if let Some(value) = env_bool("EF_LLM_ENABLED") {
            self.llm.enabled = value;
        }
        if let Some(value) = env_string("EF_LLM_ENDPOINT") {
            self.llm.endpoint = value;
        }
        if let Some(value) = env_string("EF_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = env_string("EF_LLM_API_KEY") {
            self.llm.api_key = Some(value);
        }
        if let Some(value) = env_u64("EF_LLM_TIMEOUT_SECS")? {
            self.llm.timeout_secs = value;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Top-N bound on returned candidates.
    #[serde(default)]
    pub max_recommendations: usize,
    /// Run the full-text backstop when a complex query produced fewer
    /// candidates than this.
    #[serde(default)]
    pub fulltext_backstop_below: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 10,
            fulltext_backstop_below: 5,
        }
    }
}

impl FinderConfig {
    fn merge(&mut self, patch: FinderPatch) {
        if let Some(value) = patch.max_recommendations {
            self.max_recommendations = value;
        }
        if let Some(value) = patch.fulltext_backstop_below {
            self.fulltext_backstop_below = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Disabled by default: the finder is fully functional without it.
    #[serde(default)]
    pub enabled: bool,
    /// OpenAI-compatible base URL (cloud API or local inference server).
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_secs: u64,
    #[serde(default)]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:11434/v1".to_string(),
            model: "llama3".to_string(),
            api_key: None,
            timeout_secs: 10,
            temperature: 0.2,
        }
    }
}

impl LlmConfig {
    fn merge(&mut self, patch: LlmPatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.endpoint {
            self.endpoint = value;
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.api_key {
            self.api_key = Some(value);
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
        if let Some(value) = patch.temperature {
            self.temperature = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub finder: Option<FinderPatch>,
    pub llm: Option<LlmPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FinderPatch {
    pub max_recommendations: Option<usize>,
    pub fulltext_backstop_below: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LlmPatch {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub temperature: Option<f32>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| EfError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| EfError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.finder.max_recommendations, 10);
        assert!(!config.llm.enabled);
        assert_eq!(config.llm.timeout_secs, 10);
    }

    #[test]
    fn patch_merges_over_defaults() {
        let mut config = Config::default();
        let patch: ConfigPatch = toml::from_str(
            r#"
            [finder]
            max_recommendations = 3

            [llm]
            enabled = true
            model = "mistral"
            "#,
        )
        .unwrap();
        config.merge_patch(patch);
        assert_eq!(config.finder.max_recommendations, 3);
        assert!(config.llm.enabled);
        assert_eq!(config.llm.model, "mistral");
        // Untouched fields keep defaults.
        assert_eq!(config.finder.fulltext_backstop_below, 5);
        assert_eq!(config.llm.endpoint, "http://localhost:11434/v1");
    }
}

//! Pipeline configuration

use std::path::Path;

use serde::Deserialize;

use crate::error::RuntimeError;

/// Settings for one prompt build.
///
/// Missing keys fall back to the defaults of [`PipelineConfig::new`] when
/// deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of most recent history messages considered (also the image window)
    pub history_limit: usize,
    /// Maximum images attached from history; 0 disables image attachment
    pub max_images: usize,
    /// Persona to use when the conversation has no override (empty = none)
    pub persona_name: String,
    /// Let the model decline to answer with `<NO_RESPONSE>`
    pub read_air: bool,
    /// Attach the invocation's tool manager
    pub use_tools: bool,
    /// Name that stands in for the bot's own messages in stored history
    pub self_alias: String,
    /// Characters of quoted text kept before truncation
    pub quote_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self {
            history_limit: 10,
            max_images: 0,
            persona_name: String::new(),
            read_air: false,
            use_tools: false,
            self_alias: "Bot".to_string(),
            quote_limit: 30,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_max_images(mut self, max: usize) -> Self {
        self.max_images = max;
        self
    }

    pub fn with_persona(mut self, name: impl Into<String>) -> Self {
        self.persona_name = name.into();
        self
    }

    pub fn with_read_air(mut self, on: bool) -> Self {
        self.read_air = on;
        self
    }

    pub fn with_tools(mut self, on: bool) -> Self {
        self.use_tools = on;
        self
    }

    pub fn with_self_alias(mut self, alias: impl Into<String>) -> Self {
        self.self_alias = alias.into();
        self
    }

    pub fn with_quote_limit(mut self, limit: usize) -> Self {
        self.quote_limit = limit;
        self
    }

    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, RuntimeError> {
        toml::from_str(source).map_err(|e| RuntimeError::ConfigError(e.to_string()))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, RuntimeError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Overlay `PARLEY_*` environment variables on top of `self`.
    ///
    /// Unparseable values are ignored.
    pub fn merge_env(mut self) -> Self {
        if let Some(val) = env_parse::<usize>("PARLEY_HISTORY_LIMIT") {
            self.history_limit = val;
        }

        if let Some(val) = env_parse::<usize>("PARLEY_MAX_IMAGES") {
            self.max_images = val;
        }

        if let Ok(name) = std::env::var("PARLEY_PERSONA") {
            self.persona_name = name;
        }

        if let Some(val) = env_flag("PARLEY_READ_AIR") {
            self.read_air = val;
        }

        if let Some(val) = env_flag("PARLEY_USE_TOOLS") {
            self.use_tools = val;
        }

        if let Ok(alias) = std::env::var("PARLEY_SELF_ALIAS") {
            self.self_alias = alias;
        }

        if let Some(val) = env_parse::<usize>("PARLEY_QUOTE_LIMIT") {
            self.quote_limit = val;
        }

        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::new().merge_env()
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

fn env_flag(name: &str) -> Option<bool> {
    match std::env::var(name).ok()?.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_new() {
        let config = PipelineConfig::new();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.max_images, 0);
        assert!(config.persona_name.is_empty());
        assert!(!config.read_air);
        assert!(!config.use_tools);
        assert_eq!(config.self_alias, "Bot");
        assert_eq!(config.quote_limit, 30);
    }

    #[test]
    fn test_pipeline_config_builder() {
        let config = PipelineConfig::new()
            .with_history_limit(20)
            .with_max_images(3)
            .with_persona("catgirl")
            .with_read_air(true)
            .with_tools(true)
            .with_self_alias("AstrBot")
            .with_quote_limit(50);

        assert_eq!(config.history_limit, 20);
        assert_eq!(config.max_images, 3);
        assert_eq!(config.persona_name, "catgirl");
        assert!(config.read_air);
        assert!(config.use_tools);
        assert_eq!(config.self_alias, "AstrBot");
        assert_eq!(config.quote_limit, 50);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = PipelineConfig::from_toml_str(
            r#"
            history_limit = 5
            max_images = 2
            read_air = true
            "#,
        )
        .unwrap();

        assert_eq!(config.history_limit, 5);
        assert_eq!(config.max_images, 2);
        assert!(config.read_air);
        assert_eq!(config.self_alias, "Bot");
    }

    #[test]
    fn test_from_toml_rejects_bad_types() {
        let err = PipelineConfig::from_toml_str("history_limit = \"ten\"").unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigError(_)));
    }

    #[test]
    fn test_env_flag_parsing() {
        std::env::set_var("PARLEY_TEST_FLAG_ON", "Yes");
        std::env::set_var("PARLEY_TEST_FLAG_OFF", "0");
        std::env::set_var("PARLEY_TEST_FLAG_BAD", "maybe");

        assert_eq!(env_flag("PARLEY_TEST_FLAG_ON"), Some(true));
        assert_eq!(env_flag("PARLEY_TEST_FLAG_OFF"), Some(false));
        assert_eq!(env_flag("PARLEY_TEST_FLAG_BAD"), None);
        assert_eq!(env_flag("PARLEY_TEST_FLAG_UNSET"), None);

        std::env::remove_var("PARLEY_TEST_FLAG_ON");
        std::env::remove_var("PARLEY_TEST_FLAG_OFF");
        std::env::remove_var("PARLEY_TEST_FLAG_BAD");
    }
}

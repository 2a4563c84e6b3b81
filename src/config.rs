// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for ciq
//!
//! Loads configuration from .ciqrc.toml in the project root or ~/.config/ciq/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Output format for results (mirrored from cli for library use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

/// Intent-classifier overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Replaces the built-in common-words list when set
    pub common_words: Option<Vec<String>>,
}

/// Configuration loaded from .ciqrc.toml or ~/.config/ciq/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of results to return
    pub max_results: Option<usize>,
    /// Default output format (text or json)
    pub default_format: Option<String>,
    /// Patterns to exclude from indexing
    pub exclude_patterns: Vec<String>,
    /// Abort a search that runs longer than this many milliseconds
    pub search_timeout_ms: Option<u64>,
    /// Intent-classifier tuning
    pub classifier: ClassifierConfig,
}

impl Config {
    /// Load configuration relative to the current directory
    pub fn load() -> Self {
        Self::load_for_dir(Path::new("."))
    }

    /// Load configuration for a project root
    ///
    /// Precedence (highest to lowest):
    /// 1. .ciqrc.toml in the project root
    /// 2. ~/.config/ciq/config.toml
    pub fn load_for_dir(root: &Path) -> Self {
        if let Some(config) = Self::load_from_path(&root.join(".ciqrc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("ciq").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    fn load_from_path(path: &PathBuf) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get output format from config, parsing the string to ConfigOutputFormat
    pub fn output_format(&self) -> Option<ConfigOutputFormat> {
        self.default_format
            .as_ref()
            .and_then(|s| match s.to_lowercase().as_str() {
                "json" => Some(ConfigOutputFormat::Json),
                "text" => Some(ConfigOutputFormat::Text),
                _ => None,
            })
    }

    /// Merge CLI options with config (CLI wins)
    pub fn merge_max_results(&self, cli_value: Option<usize>) -> usize {
        cli_value.or(self.max_results).unwrap_or(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_classifier_section() {
        let config: Config = toml::from_str(
            r#"
            max_results = 25
            default_format = "json"

            [classifier]
            common_words = ["the", "token"]
            "#,
        )
        .expect("valid config");

        assert_eq!(config.max_results, Some(25));
        assert_eq!(config.output_format(), Some(ConfigOutputFormat::Json));
        assert_eq!(
            config.classifier.common_words.as_deref(),
            Some(&["the".to_string(), "token".to_string()][..])
        );
    }

    #[test]
    fn cli_value_wins_over_config() {
        let config = Config {
            max_results: Some(50),
            ..Config::default()
        };
        assert_eq!(config.merge_max_results(Some(5)), 5);
        assert_eq!(config.merge_max_results(None), 50);
        assert_eq!(Config::default().merge_max_results(None), 10);
    }

    #[test]
    fn unknown_format_string_is_ignored() {
        let config = Config {
            default_format: Some("yaml".to_string()),
            ..Config::default()
        };
        assert_eq!(config.output_format(), None);
    }
}

//! Configuration loading and parsing

use anyhow::{Context, Result};
use linak_lin_decoder::DecoderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub decoder: DecoderSection,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DecoderSection {
    #[serde(flatten)]
    pub settings: DecoderConfig,
    /// Close the last frame of each capture even though no break follows it
    #[serde(default = "default_true")]
    pub flush_at_end: bool,
}

impl Default for DecoderSection {
    fn default() -> Self {
        Self {
            settings: DecoderConfig::default(),
            flush_at_end: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub include_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            output_file: None,
            include_summary: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

fn default_true() -> bool {
    true
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            files = ["desk.jsonl", "bed.jsonl"]

            [decoder]
            show_empty_frames = false
            flush_at_end = false

            [output]
            format = "json"
            output_file = "transactions.jsonl"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.files.len(), 2);
        assert!(!config.decoder.settings.show_empty_frames);
        assert!(!config.decoder.flush_at_end);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.output_file, Some(PathBuf::from("transactions.jsonl")));
        assert!(config.output.include_summary);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.input.files.is_empty());
        assert!(config.decoder.settings.show_empty_frames);
        assert!(config.decoder.flush_at_end);
        assert_eq!(config.output.format, OutputFormat::Txt);
    }
}

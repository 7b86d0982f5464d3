//! Flow definition loading and validation

use crate::config::types::{get_default_validation, StepType, Validation};
use crate::constants::CONFIG_FILENAMES;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// One prompt of a definition-driven flow
#[derive(Debug, Clone, Deserialize)]
pub struct StepDefinition {
    /// Prompt text shown above the input.
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub r#type: StepType,
    #[serde(default)]
    pub default: serde_json::Value,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub ignore_focus_out: bool,
    #[serde(default = "get_default_validation")]
    pub validation: Validation,
}

impl StepDefinition {
    /// Default answer as text, if one is configured.
    pub fn default_text(&self) -> Option<String> {
        match &self.default {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Ordered steps of a wizard
#[derive(Debug, Clone, Deserialize)]
pub struct FlowDefinition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub steps: IndexMap<String, StepDefinition>,
}

impl FlowDefinition {
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(Error::ConfigValidation("a flow needs at least one step".into()));
        }
        for (name, step) in &self.steps {
            if step.r#type == StepType::Choice && step.choices.is_empty() {
                return Err(Error::ConfigValidation(format!(
                    "choice step '{name}' has no choices"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "schemaVersion")]
pub enum Config {
    #[serde(rename = "v1")]
    V1(FlowDefinition),
}

impl Config {
    /// Loads a definition from a file, or from the first known definition file
    /// inside a directory.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            return Self::parse_file(path);
        }

        for config_file_name in CONFIG_FILENAMES.iter() {
            let config_file_path = path.join(config_file_name);
            if config_file_path.exists() {
                log::debug!("Loading flow definition from {}", config_file_path.display());
                return Self::parse_file(&config_file_path);
            }
        }

        Err(Error::ConfigNotFound {
            flow_dir: path.display().to_string(),
            config_files: CONFIG_FILENAMES.join(", "),
        })
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        let config: Config = match extension {
            "json" => serde_json::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            other => {
                return Err(Error::ConfigValidation(format!(
                    "unsupported definition format '{other}' of {}",
                    path.display()
                )))
            }
        };
        Ok(config)
    }

    /// Validated definition carried by this config.
    pub fn into_definition(self) -> Result<FlowDefinition> {
        let Config::V1(definition) = self;
        definition.validate()?;
        Ok(definition)
    }
}

//! Basic types for flow definitions

use crate::constants::validation;
use serde::Deserialize;

/// Kind of prompt a step shows
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// Free text entered in an input box
    #[default]
    Str,
    /// One value picked from `choices`
    Choice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Validation {
    /// Regular expression the whole answer must match.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "get_default_error_message")]
    pub error_message: String,
}

fn get_default_error_message() -> String {
    validation::INVALID_ANSWER.to_string()
}

pub fn get_default_validation() -> Validation {
    Validation { pattern: None, required: false, error_message: get_default_error_message() }
}

impl Default for Validation {
    fn default() -> Self {
        get_default_validation()
    }
}

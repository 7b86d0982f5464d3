use crate::{
    config::{StepDefinition, StepType, Validation},
    error::{Error, Result},
    prompt::Validator,
};
use regex::Regex;
use std::sync::Arc;

/// Compiled form of a step's [`Validation`].
#[derive(Debug, Clone)]
pub struct AnswerRule {
    pattern: Option<Regex>,
    required: bool,
    error_message: String,
}

impl AnswerRule {
    pub fn compile(validation: &Validation) -> Result<Self> {
        let pattern = validation
            .pattern
            .as_deref()
            .map(|pattern| Regex::new(&format!("^(?:{pattern})$")))
            .transpose()?;
        Ok(Self {
            pattern,
            required: validation.required,
            error_message: validation.error_message.clone(),
        })
    }

    /// Error message for `answer`, or `None` when it is acceptable.
    ///
    /// An empty answer only fails when the step is required.
    pub fn check(&self, answer: &str) -> Option<String> {
        if answer.is_empty() {
            return self.required.then(|| self.error_message.clone());
        }
        match &self.pattern {
            Some(pattern) if !pattern.is_match(answer) => Some(self.error_message.clone()),
            _ => None,
        }
    }

    pub fn into_validator(self) -> Validator {
        let rule = Arc::new(self);
        Validator::new(move |candidate: String| {
            let rule = rule.clone();
            async move { rule.check(&candidate) }
        })
    }
}

/// Validate a preset answer for `step` before it is accepted without prompting.
pub fn validate_answer(name: &str, step: &StepDefinition, answer: &serde_json::Value) -> Result<()> {
    let text = match answer {
        serde_json::Value::String(text) => text.as_str(),
        other => {
            return Err(Error::ValidationError(format!(
                "answer for '{name}' must be a string, got {other}"
            )))
        }
    };
    match step.r#type {
        StepType::Choice if !step.choices.iter().any(|choice| choice == text) => {
            Err(Error::ValidationError(format!(
                "'{text}' is not one of the choices of '{name}': {}",
                step.choices.join(", ")
            )))
        }
        StepType::Choice => Ok(()),
        StepType::Str => match AnswerRule::compile(&step.validation)?.check(text) {
            Some(message) => Err(Error::ValidationError(format!("{name}: {message}"))),
            None => Ok(()),
        },
    }
}

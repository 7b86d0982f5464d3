//! Steps generated from a [`FlowDefinition`]

use crate::{
    cli::answers::AnswerMap,
    config::{FlowDefinition, StepDefinition, StepType},
    error::{Error, Result},
    flow::{done, MultiStepInput, Step, StepRef},
    prompt::{InputBoxOptions, QuickPickOptions, ShouldResume, Validator},
    validation::{validate_answer, AnswerRule},
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Entry {
    name: String,
    definition: StepDefinition,
    validator: Validator,
}

/// Everything the steps of one definition share.
pub struct StepChain {
    title: Option<String>,
    entries: Vec<Entry>,
    presets: Map<String, Value>,
    non_interactive: bool,
    should_resume: ShouldResume,
    answers: Arc<Mutex<AnswerMap>>,
}

impl StepChain {
    pub fn new(
        definition: FlowDefinition,
        presets: Map<String, Value>,
        non_interactive: bool,
        should_resume: ShouldResume,
    ) -> Result<Arc<Self>> {
        definition.validate()?;
        let entries = definition
            .steps
            .into_iter()
            .map(|(name, definition)| -> Result<Entry> {
                let validator = AnswerRule::compile(&definition.validation)?.into_validator();
                Ok(Entry { name, definition, validator })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Arc::new(Self {
            title: definition.title,
            entries,
            presets,
            non_interactive,
            should_resume,
            answers: Arc::default(),
        }))
    }

    /// First step of the chain.
    pub fn first(self: &Arc<Self>) -> StepRef {
        Arc::new(DefinitionStep { chain: self.clone(), index: 0 })
    }

    /// Snapshot of the answers recorded so far.
    pub fn answers(&self) -> AnswerMap {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, AnswerMap> {
        self.answers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, name: &str, answer: Value) {
        log::debug!("Answer for '{name}': {answer}");
        self.lock().insert(name.to_string(), answer);
    }

    /// Value a prompt opens with: the previous answer when revisiting a step,
    /// then the preset, then the configured default.
    fn initial(&self, entry: &Entry) -> Option<String> {
        let previous = self.lock().get(&entry.name).cloned();
        previous
            .or_else(|| self.presets.get(&entry.name).cloned())
            .and_then(|value| match value {
                Value::String(text) => Some(text),
                _ => None,
            })
            .or_else(|| entry.definition.default_text())
    }

    /// Answer used without prompting in non-interactive mode.
    fn unattended(&self, entry: &Entry) -> Result<Value> {
        if let Some(preset) = self.presets.get(&entry.name) {
            validate_answer(&entry.name, &entry.definition, preset)?;
            return Ok(preset.clone());
        }
        match entry.definition.default_text() {
            Some(default) => {
                let default = Value::String(default);
                validate_answer(&entry.name, &entry.definition, &default)?;
                Ok(default)
            }
            None => Err(Error::ValidationError(format!(
                "no answer for '{}' in non-interactive mode",
                entry.name
            ))),
        }
    }
}

/// Prompt for one entry of a [`StepChain`].
pub struct DefinitionStep {
    chain: Arc<StepChain>,
    index: usize,
}

impl DefinitionStep {
    fn entry(&self) -> &Entry {
        &self.chain.entries[self.index]
    }

    fn advance(&self) -> Result<Option<StepRef>> {
        let index = self.index + 1;
        if index < self.chain.entries.len() {
            Ok(Some(Arc::new(DefinitionStep { chain: self.chain.clone(), index })))
        } else {
            done()
        }
    }
}

#[async_trait]
impl Step for DefinitionStep {
    fn name(&self) -> &str {
        &self.entry().name
    }

    async fn run(&self, input: &mut MultiStepInput) -> Result<Option<StepRef>> {
        let chain = &self.chain;
        let entry = self.entry();

        if chain.non_interactive {
            chain.record(&entry.name, chain.unattended(entry)?);
            return self.advance();
        }

        let step = self.index + 1;
        let total_steps = chain.entries.len();
        let help = (!entry.definition.help.is_empty()).then(|| entry.definition.help.clone());
        let answer = match entry.definition.r#type {
            StepType::Choice => {
                let initial = chain.initial(entry);
                let options = QuickPickOptions {
                    title: chain.title.clone(),
                    step,
                    total_steps,
                    items: entry.definition.choices.clone(),
                    active_item: initial.filter(|i| entry.definition.choices.contains(i)),
                    placeholder: entry.definition.placeholder.clone().or(help),
                    ignore_focus_out: entry.definition.ignore_focus_out,
                    should_resume: chain.should_resume.clone(),
                    ..QuickPickOptions::default()
                };
                input.show_quick_pick(options).await?
            }
            StepType::Str => {
                let options = InputBoxOptions {
                    title: chain.title.clone(),
                    step,
                    total_steps,
                    value: chain.initial(entry).unwrap_or_default(),
                    prompt: help,
                    placeholder: entry.definition.placeholder.clone(),
                    ignore_focus_out: entry.definition.ignore_focus_out,
                    validate: entry.validator.clone(),
                    should_resume: chain.should_resume.clone(),
                    ..InputBoxOptions::default()
                };
                input.show_input_box(options).await?
            }
        };

        chain.record(&entry.name, Value::String(answer));
        self.advance()
    }
}

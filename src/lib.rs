/// Handles argument parsing and the definition-driven wizard.
pub mod cli;

/// Flow definition files.
pub mod config;

pub mod constants;

/// Keyed, restartable delayed actions.
pub mod debounce;

/// Defines custom error types.
pub mod error;

/// The step engine: history, navigation signals and single-flow admission.
pub mod flow;

/// Choice and text prompts shown by steps.
pub mod prompt;

/// An abstraction over the interactive widgets prompts are shown on.
pub mod surface;

/// Answer validators
pub mod validation;

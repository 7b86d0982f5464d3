use crate::flow::FlowSignal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Navigation request raised by a prompt. Only the flow engine interprets it.
    #[error("Flow signal: {0}.")]
    Signal(FlowSignal),

    /// `Back` was requested while the history holds no predecessor step.
    #[error("Cannot go back: no previous step in history (depth {depth}).")]
    NoPreviousStep { depth: usize },

    #[error("Cannot proceed: another flow is already running.")]
    FlowAlreadyRunning,

    /// The surface backend dropped its event stream without reporting a hide.
    #[error("Prompt surface closed unexpectedly.")]
    SurfaceClosed,

    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid validation pattern. Original error: {0}")]
    RegexError(#[from] regex::Error),

    /// The surface backend could not interact with the user.
    #[error("Terminal interaction failed. Original error: {0}")]
    SurfaceFailed(String),

    #[error("No flow definition found in '{flow_dir}'. Tried: {config_files}.")]
    ConfigNotFound { flow_dir: String, config_files: String },

    #[error("Invalid flow definition: {0}.")]
    ConfigValidation(String),

    /// Represents validation failures in user input or data
    #[error("Validation error: {0}.")]
    ValidationError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns the carried flow signal, if this error is one.
    pub fn as_signal(&self) -> Option<FlowSignal> {
        match self {
            Error::Signal(signal) => Some(*signal),
            _ => None,
        }
    }
}

impl From<FlowSignal> for Error {
    fn from(signal: FlowSignal) -> Self {
        Error::Signal(signal)
    }
}

/// Convenience type alias for Results with the crate error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(crate::constants::exit_codes::FAILURE);
}

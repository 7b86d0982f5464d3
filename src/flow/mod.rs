//! Multi-step input flows
//!
//! A flow is a chain of [`Step`]s. Each step shows one prompt through the
//! [`MultiStepInput`] it receives and returns the step to run next, or `None`
//! when the flow is complete. Navigation is requested by failing with
//! [`Error::Signal`]; the engine is the only place those signals are handled.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::{fmt, sync::Arc};

pub mod engine;
pub mod gate;
pub mod stack;

pub use engine::MultiStepInput;
pub use gate::FlowGate;
pub use stack::StepStack;

/// Control signals that redirect a running flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowSignal {
    /// Re-run the step before the current one.
    Back,
    /// Abandon the flow.
    Cancel,
    /// Re-run the current step, typically after the user dismissed its prompt.
    Resume,
}

impl fmt::Display for FlowSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowSignal::Back => "back",
            FlowSignal::Cancel => "cancel",
            FlowSignal::Resume => "resume",
        };
        write!(f, "{s}")
    }
}

/// How a flow run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The last step returned no successor.
    Completed,
    /// A `Cancel` signal ended the flow.
    Cancelled,
}

pub type StepRef = Arc<dyn Step>;

/// One unit of a wizard. Steps may run several times (after `Back` or
/// `Resume`), so they only get shared access to themselves.
#[async_trait]
pub trait Step: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, input: &mut MultiStepInput) -> Result<Option<StepRef>>;
}

/// Result of a step that continues with `step`.
pub fn next(step: impl Step + 'static) -> Result<Option<StepRef>> {
    Ok(Some(Arc::new(step)))
}

/// Result of the last step of a flow.
pub fn done() -> Result<Option<StepRef>> {
    Ok(None)
}

/// Result of a step that raises `signal` itself.
pub fn signal(signal: FlowSignal) -> Result<Option<StepRef>> {
    Err(Error::Signal(signal))
}

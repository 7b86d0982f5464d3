use super::StepRef;
use crate::error::{Error, Result};

/// Navigation history: every step entered, in execution order.
///
/// The top is always the step currently executing or about to execute.
#[derive(Default)]
pub struct StepStack {
    steps: Vec<StepRef>,
}

impl StepStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: StepRef) {
        self.steps.push(step);
    }

    pub fn pop(&mut self) -> Option<StepRef> {
        self.steps.pop()
    }

    /// Drops the current step and takes its predecessor off the stack so it can
    /// be re-run. Fails without touching the history when there is no predecessor.
    pub fn rewind(&mut self) -> Result<StepRef> {
        let depth = self.steps.len();
        if depth < 2 {
            return Err(Error::NoPreviousStep { depth });
        }
        self.steps.pop();
        self.steps.pop().ok_or(Error::NoPreviousStep { depth })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

impl std::fmt::Debug for StepStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.steps.iter().map(|step| step.name())).finish()
    }
}

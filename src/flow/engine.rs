use super::{FlowOutcome, FlowSignal, StepRef, StepStack};
use crate::{
    error::{Error, Result},
    prompt::PromptButton,
    surface::{
        ButtonId, ButtonSpec, InputBoxSurface, QuickPickSurface, SurfaceProvider,
    },
};
use std::sync::Arc;
use tokio::sync::OwnedSemaphorePermit;

/// The surface currently occupying the engine's single visible slot.
pub(crate) enum ActiveSurface {
    QuickPick(Box<dyn QuickPickSurface>),
    InputBox(Box<dyn InputBoxSurface>),
}

impl ActiveSurface {
    fn show(&mut self) {
        match self {
            ActiveSurface::QuickPick(surface) => surface.show(),
            ActiveSurface::InputBox(surface) => surface.show(),
        }
    }

    /// Marks the surface as superseded while the next step starts.
    fn set_pending(&mut self) {
        match self {
            ActiveSurface::QuickPick(surface) => {
                surface.set_enabled(false);
                surface.set_busy(true);
            }
            ActiveSurface::InputBox(surface) => {
                surface.set_enabled(false);
                surface.set_busy(true);
            }
        }
    }

    fn dispose(&mut self) {
        match self {
            ActiveSurface::QuickPick(surface) => surface.dispose(),
            ActiveSurface::InputBox(surface) => surface.dispose(),
        }
    }
}

/// Runs a chain of steps and owns the one prompt surface visible at a time.
///
/// Created once per wizard invocation; [`run`](Self::run) consumes it.
pub struct MultiStepInput {
    provider: Arc<dyn SurfaceProvider>,
    steps: StepStack,
    current: Option<ActiveSurface>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl MultiStepInput {
    pub fn new(provider: Arc<dyn SurfaceProvider>) -> Self {
        Self { provider, steps: StepStack::new(), current: None, _permit: None }
    }

    pub(crate) fn with_permit(
        provider: Arc<dyn SurfaceProvider>,
        permit: OwnedSemaphorePermit,
    ) -> Self {
        Self { _permit: Some(permit), ..Self::new(provider) }
    }

    /// Number of steps in the navigation history, including the running one.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Runs `start` and every step it leads to.
    ///
    /// Returns `Cancelled` when a step ends with `Cancel`; any error other
    /// than a flow signal is returned unchanged. The visible surface is
    /// disposed on every exit path.
    pub async fn run(mut self, start: StepRef) -> Result<FlowOutcome> {
        let outcome = self.step_through(start).await;
        if let Some(mut current) = self.current.take() {
            current.dispose();
        }
        self.steps.clear();
        outcome
    }

    async fn step_through(&mut self, start: StepRef) -> Result<FlowOutcome> {
        let mut step = Some(start);
        while let Some(current) = step.take() {
            if let Some(surface) = self.current.as_mut() {
                surface.set_pending();
            }
            self.steps.push(current.clone());
            log::debug!("Entering step '{}' (depth {})", current.name(), self.steps.len());

            step = match current.run(self).await {
                Ok(next) => next,
                Err(Error::Signal(FlowSignal::Back)) => {
                    log::debug!("Going back from step '{}'", current.name());
                    Some(self.steps.rewind()?)
                }
                Err(Error::Signal(FlowSignal::Resume)) => {
                    log::debug!("Resuming step '{}'", current.name());
                    self.steps.pop()
                }
                Err(Error::Signal(FlowSignal::Cancel)) => {
                    log::info!("Flow cancelled at step '{}'", current.name());
                    return Ok(FlowOutcome::Cancelled);
                }
                Err(e) => return Err(e),
            };
        }
        Ok(FlowOutcome::Completed)
    }

    /// Disposes whatever surface is visible, then shows `surface` in its place.
    pub(crate) fn install(&mut self, mut surface: ActiveSurface) {
        if let Some(mut previous) = self.current.take() {
            previous.dispose();
        }
        surface.show();
        self.current = Some(surface);
    }

    pub(crate) fn input_box(&mut self) -> Option<&mut Box<dyn InputBoxSurface>> {
        match self.current.as_mut() {
            Some(ActiveSurface::InputBox(surface)) => Some(surface),
            _ => None,
        }
    }

    /// Buttons to display: `Back` on every step but the first, then the caller's.
    pub(crate) fn button_specs(&self, buttons: &[PromptButton]) -> Vec<ButtonSpec> {
        let back = (self.steps.len() > 1).then(ButtonSpec::back);
        back.into_iter()
            .chain(buttons.iter().enumerate().map(|(index, button)| ButtonSpec {
                id: ButtonId::Custom(index),
                tooltip: button.tooltip.clone(),
            }))
            .collect()
    }

    /// Reacts to a button press. `Back` rejects the prompt; custom buttons run
    /// their handler and leave the prompt open.
    pub(crate) fn trigger_button(&self, id: ButtonId, buttons: &[PromptButton]) -> Result<()> {
        match id {
            ButtonId::Back => Err(Error::Signal(FlowSignal::Back)),
            ButtonId::Custom(index) => {
                match buttons.get(index).and_then(|button| button.handler.as_ref()) {
                    Some(handler) => handler(),
                    None => log::debug!("Button {index} has no handler"),
                }
                Ok(())
            }
        }
    }

    pub(crate) fn provider(&self) -> Arc<dyn SurfaceProvider> {
        self.provider.clone()
    }
}

impl std::fmt::Debug for MultiStepInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiStepInput")
            .field("steps", &self.steps)
            .field("has_current", &self.current.is_some())
            .finish()
    }
}

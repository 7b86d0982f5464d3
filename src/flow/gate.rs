use super::MultiStepInput;
use crate::{
    error::{Error, Result},
    surface::SurfaceProvider,
};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Admits one flow at a time.
///
/// The permit lives inside the [`MultiStepInput`] handed out, so the gate
/// opens again as soon as that flow finishes or is dropped. Flows started
/// through different gates never exclude each other.
#[derive(Debug, Clone)]
pub struct FlowGate {
    permits: Arc<Semaphore>,
}

impl FlowGate {
    pub fn new() -> Self {
        Self { permits: Arc::new(Semaphore::new(1)) }
    }

    /// Starts a flow, or fails with `FlowAlreadyRunning` while another one holds the gate.
    pub fn try_start(&self, provider: Arc<dyn SurfaceProvider>) -> Result<MultiStepInput> {
        let permit =
            self.permits.clone().try_acquire_owned().map_err(|_| Error::FlowAlreadyRunning)?;
        log::debug!("Flow gate acquired");
        Ok(MultiStepInput::with_permit(provider, permit))
    }

    pub fn is_running(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

impl Default for FlowGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::scripted::ScriptedSurfaceProvider;

    fn provider() -> Arc<dyn SurfaceProvider> {
        Arc::new(ScriptedSurfaceProvider::new())
    }

    #[test]
    fn refuses_a_second_flow_until_the_first_is_dropped() {
        let gate = FlowGate::new();
        let first = gate.try_start(provider()).unwrap();
        assert!(gate.is_running());
        assert!(matches!(gate.try_start(provider()), Err(Error::FlowAlreadyRunning)));

        drop(first);
        assert!(!gate.is_running());
        assert!(gate.try_start(provider()).is_ok());
    }

    #[test]
    fn separate_gates_are_independent() {
        let left = FlowGate::new();
        let right = FlowGate::new();
        let _a = left.try_start(provider()).unwrap();
        let _b = right.try_start(provider()).unwrap();
        assert!(left.is_running() && right.is_running());
    }
}

use crate::{
    cli::{
        answers::{preset_answers, write_answers},
        steps::StepChain,
        Args,
    },
    config::{Config, FlowDefinition},
    error::Result,
    flow::{FlowGate, FlowOutcome},
    prompt::ShouldResume,
    surface::{
        terminal::{confirm_resume, TerminalSurfaceProvider},
        SurfaceProvider,
    },
};
use std::sync::Arc;

/// Main CLI runner that loads a flow definition, walks it and reports the answers
pub struct Runner {
    args: Args,
    provider: Arc<dyn SurfaceProvider>,
    should_resume: ShouldResume,
    gate: FlowGate,
}

impl Runner {
    /// Runner prompting on the terminal.
    pub fn new(args: Args) -> Self {
        Self::with_surfaces(args, Arc::new(TerminalSurfaceProvider::new()), confirm_resume())
    }

    pub fn with_surfaces(
        args: Args,
        provider: Arc<dyn SurfaceProvider>,
        should_resume: ShouldResume,
    ) -> Self {
        Self { args, provider, should_resume, gate: FlowGate::new() }
    }

    /// Executes the complete flow
    pub async fn run(self) -> Result<FlowOutcome> {
        let definition = self.load_and_validate_config()?;
        let presets = preset_answers(self.args.answers.clone())?;
        log::debug!(
            "Running flow with {} steps and {} preset answers",
            definition.steps.len(),
            presets.len()
        );

        let chain = StepChain::new(
            definition,
            presets,
            self.args.non_interactive,
            self.should_resume.clone(),
        )?;
        let input = self.gate.try_start(self.provider.clone())?;

        let outcome = input.run(chain.first()).await?;
        match outcome {
            FlowOutcome::Completed => write_answers(&chain.answers(), self.args.output.as_deref())?,
            FlowOutcome::Cancelled => log::info!("Flow cancelled, no answers written."),
        }
        Ok(outcome)
    }

    /// Loads and validates the flow definition
    fn load_and_validate_config(&self) -> Result<FlowDefinition> {
        Config::load_config(&self.args.flow)?.into_definition()
    }
}

/// Main entry point for CLI execution
pub async fn run(args: Args) -> Result<()> {
    let runner = Runner::new(args);
    runner.run().await.map(|_| ())
}

use async_trait::async_trait;
use multistep::{
    error::Result,
    flow::{done, MultiStepInput, Step, StepRef},
    prompt::{QuickPickOptions, ShouldResume},
    surface::{scripted::ScriptedEvent, SurfaceEvent},
};
use std::sync::{Arc, Mutex};

/// A chain of list steps, one per name, each offering its own name as the only item.
pub struct PickChain {
    names: Vec<&'static str>,
    should_resume: ShouldResume,
    visits: Mutex<Vec<&'static str>>,
}

impl PickChain {
    pub fn new(names: Vec<&'static str>, should_resume: ShouldResume) -> Arc<Self> {
        Arc::new(Self { names, should_resume, visits: Mutex::new(Vec::new()) })
    }

    pub fn first(self: &Arc<Self>) -> StepRef {
        Arc::new(PickStep { chain: self.clone(), index: 0 })
    }

    /// Names of the steps in the order they ran.
    pub fn visits(&self) -> Vec<&'static str> {
        self.visits.lock().unwrap().clone()
    }
}

struct PickStep {
    chain: Arc<PickChain>,
    index: usize,
}

#[async_trait]
impl Step for PickStep {
    fn name(&self) -> &str {
        self.chain.names[self.index]
    }

    async fn run(&self, input: &mut MultiStepInput) -> Result<Option<StepRef>> {
        let name = self.chain.names[self.index];
        self.chain.visits.lock().unwrap().push(name);
        let options = QuickPickOptions {
            title: Some("Integration".into()),
            step: self.index + 1,
            total_steps: self.chain.names.len(),
            items: vec![name],
            should_resume: self.chain.should_resume.clone(),
            ..QuickPickOptions::default()
        };
        input.show_quick_pick(options).await?;

        let index = self.index + 1;
        if index < self.chain.names.len() {
            Ok(Some(Arc::new(PickStep { chain: self.chain.clone(), index })))
        } else {
            done()
        }
    }
}

pub fn pick() -> Vec<ScriptedEvent> {
    vec![ScriptedEvent::now(SurfaceEvent::SelectionChanged(vec![0]))]
}

pub fn only(event: SurfaceEvent) -> Vec<ScriptedEvent> {
    vec![ScriptedEvent::now(event)]
}

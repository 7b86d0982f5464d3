//! Surface backend that replays predefined events
//!
//! Every surface the provider creates takes the next script from its queue and,
//! once shown, delivers the scripted events in order. Each event waits for its
//! own delay, counted from the previous event. Like a real surface, it keeps
//! its event stream open after the last event until it is disposed; a
//! closing script ends the stream instead, as does an exhausted queue. All property changes are recorded
//! so callers can inspect what a flow displayed.
//! Useful for automation, testing, or CI/CD environments.

use super::{
    ButtonSpec, EventSender, InputBoxSurface, ItemView, QuickPickSurface, Subscription,
    Surface, SurfaceEvent, SurfaceProvider,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::task::JoinHandle;

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedEvent {
    pub after: Duration,
    pub event: SurfaceEvent,
}

impl ScriptedEvent {
    pub fn now(event: SurfaceEvent) -> Self {
        Self { after: Duration::ZERO, event }
    }

    pub fn after_millis(millis: u64, event: SurfaceEvent) -> Self {
        Self { after: Duration::from_millis(millis), event }
    }
}

#[derive(Debug, Clone, Default)]
struct Script {
    events: Vec<ScriptedEvent>,
    /// Drop the event stream once every event is delivered.
    close_when_done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceKind {
    #[default]
    QuickPick,
    InputBox,
}

/// Everything a scripted surface was told to display.
#[derive(Debug, Clone, Default)]
pub struct SurfaceRecord {
    pub kind: SurfaceKind,
    pub title: Option<String>,
    pub step: Option<usize>,
    pub total_steps: Option<usize>,
    pub placeholder: Option<String>,
    pub buttons: Vec<ButtonSpec>,
    pub busy: bool,
    pub enabled: bool,
    pub ignore_focus_out: bool,
    pub items: Vec<ItemView>,
    pub active_items: Vec<usize>,
    pub value: String,
    pub prompt: Option<String>,
    pub validation_message: Option<String>,
    /// Every validation message set, in order, including clears.
    pub validation_history: Vec<Option<String>>,
    pub shown: bool,
    pub disposed: bool,
    /// Events handed to a live subscriber.
    pub delivered: usize,
}

impl SurfaceRecord {
    pub fn has_back_button(&self) -> bool {
        self.buttons.iter().any(|button| button.id == super::ButtonId::Back)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct ScriptQueue {
    scripts: VecDeque<Script>,
    records: Vec<Arc<Mutex<SurfaceRecord>>>,
}

/// Provider of scripted surfaces. Cloning shares the queue and the records.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSurfaceProvider {
    queue: Arc<Mutex<ScriptQueue>>,
}

impl ScriptedSurfaceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the script for the next surface created.
    pub fn with_script(self, script: Vec<ScriptedEvent>) -> Self {
        self.push_script(script);
        self
    }

    pub fn push_script(&self, script: Vec<ScriptedEvent>) {
        lock(&self.queue).scripts.push_back(Script { events: script, close_when_done: false });
    }

    /// Like [`with_script`](Self::with_script), but the surface ends its
    /// event stream after the last event, as a failing backend would.
    pub fn with_closing_script(self, script: Vec<ScriptedEvent>) -> Self {
        lock(&self.queue).scripts.push_back(Script { events: script, close_when_done: true });
        self
    }

    /// Snapshot of every surface created so far, in creation order.
    pub fn surfaces(&self) -> Vec<SurfaceRecord> {
        lock(&self.queue).records.iter().map(|record| lock(record).clone()).collect()
    }

    pub fn undisposed(&self) -> usize {
        self.surfaces().iter().filter(|record| !record.disposed).count()
    }

    fn create(&self, kind: SurfaceKind) -> ScriptedSurface {
        let mut queue = lock(&self.queue);
        // Unscripted surfaces end at once.
        let script =
            queue.scripts.pop_front().unwrap_or(Script { events: Vec::new(), close_when_done: true });
        let record = Arc::new(Mutex::new(SurfaceRecord {
            kind,
            enabled: true,
            ..SurfaceRecord::default()
        }));
        queue.records.push(record.clone());
        log::trace!("Created scripted {kind:?} #{}", queue.records.len());
        ScriptedSurface { record, script, sender: None, replay: None }
    }
}

impl SurfaceProvider for ScriptedSurfaceProvider {
    fn create_quick_pick(&self) -> Box<dyn QuickPickSurface> {
        Box::new(self.create(SurfaceKind::QuickPick))
    }

    fn create_input_box(&self) -> Box<dyn InputBoxSurface> {
        Box::new(self.create(SurfaceKind::InputBox))
    }
}

struct ScriptedSurface {
    record: Arc<Mutex<SurfaceRecord>>,
    script: Script,
    sender: Option<EventSender>,
    replay: Option<JoinHandle<()>>,
}

impl ScriptedSurface {
    fn update(&self, change: impl FnOnce(&mut SurfaceRecord)) {
        let mut record = lock(&self.record);
        change(&mut *record);
    }
}

async fn replay(script: Script, sender: EventSender, record: Arc<Mutex<SurfaceRecord>>) {
    for scripted in script.events {
        tokio::time::sleep(scripted.after).await;
        if lock(&record).disposed || !sender.send(scripted.event) {
            return;
        }
        lock(&record).delivered += 1;
    }
    if !script.close_when_done {
        // Held until dispose aborts the replay.
        std::future::pending::<()>().await;
    }
}

impl Surface for ScriptedSurface {
    fn set_title(&mut self, title: Option<&str>) {
        self.update(|r| r.title = title.map(str::to_string));
    }

    fn set_step(&mut self, step: Option<usize>) {
        self.update(|r| r.step = step);
    }

    fn set_total_steps(&mut self, total_steps: Option<usize>) {
        self.update(|r| r.total_steps = total_steps);
    }

    fn set_placeholder(&mut self, placeholder: Option<&str>) {
        self.update(|r| r.placeholder = placeholder.map(str::to_string));
    }

    fn set_buttons(&mut self, buttons: &[ButtonSpec]) {
        self.update(|r| r.buttons = buttons.to_vec());
    }

    fn set_busy(&mut self, busy: bool) {
        self.update(|r| r.busy = busy);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.update(|r| r.enabled = enabled);
    }

    fn set_ignore_focus_out(&mut self, ignore_focus_out: bool) {
        self.update(|r| r.ignore_focus_out = ignore_focus_out);
    }

    fn subscribe(&mut self) -> Subscription {
        let (sender, subscription) = Subscription::channel();
        self.sender = Some(sender);
        subscription
    }

    fn show(&mut self) {
        self.update(|r| r.shown = true);
        if let Some(sender) = self.sender.take() {
            let script = std::mem::take(&mut self.script);
            self.replay = Some(tokio::spawn(replay(script, sender, self.record.clone())));
        }
    }

    fn dispose(&mut self) {
        if let Some(replay) = self.replay.take() {
            replay.abort();
        }
        self.sender = None;
        self.update(|r| {
            r.disposed = true;
            r.shown = false;
        });
    }
}

impl QuickPickSurface for ScriptedSurface {
    fn set_items(&mut self, items: &[ItemView]) {
        self.update(|r| r.items = items.to_vec());
    }

    fn set_active_items(&mut self, indices: &[usize]) {
        self.update(|r| r.active_items = indices.to_vec());
    }
}

impl InputBoxSurface for ScriptedSurface {
    fn set_value(&mut self, value: &str) {
        self.update(|r| r.value = value.to_string());
    }

    fn set_prompt(&mut self, prompt: Option<&str>) {
        self.update(|r| r.prompt = prompt.map(str::to_string));
    }

    fn set_validation_message(&mut self, message: Option<&str>) {
        let message = message.map(str::to_string);
        self.update(|r| {
            r.validation_history.push(message.clone());
            r.validation_message = message;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn replays_script_after_show() {
        let provider = ScriptedSurfaceProvider::new().with_closing_script(vec![
            ScriptedEvent::now(SurfaceEvent::ValueChanged("a".into())),
            ScriptedEvent::after_millis(50, SurfaceEvent::Accepted),
        ]);
        let mut surface = provider.create_input_box();
        let mut events = surface.subscribe();
        surface.show();

        assert_eq!(events.recv().await, Some(SurfaceEvent::ValueChanged("a".into())));
        assert_eq!(events.recv().await, Some(SurfaceEvent::Accepted));
        assert_eq!(events.recv().await, None);
        assert_eq!(provider.surfaces()[0].delivered, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stream_stays_open_until_dispose() {
        let provider = ScriptedSurfaceProvider::new()
            .with_script(vec![ScriptedEvent::now(SurfaceEvent::Accepted)]);
        let mut surface = provider.create_input_box();
        let mut events = surface.subscribe();
        surface.show();

        assert_eq!(events.recv().await, Some(SurfaceEvent::Accepted));
        let idle = tokio::time::timeout(Duration::from_secs(60), events.recv()).await;
        assert!(idle.is_err());

        surface.dispose();
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test]
    async fn surfaces_beyond_the_queue_end_their_stream() {
        let provider = ScriptedSurfaceProvider::new();
        let mut surface = provider.create_quick_pick();
        let mut events = surface.subscribe();
        surface.show();
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_stops_delivery() {
        let provider = ScriptedSurfaceProvider::new().with_script(vec![
            ScriptedEvent::after_millis(100, SurfaceEvent::Hidden),
        ]);
        let mut surface = provider.create_quick_pick();
        let mut events = surface.subscribe();
        surface.show();
        surface.dispose();

        assert_eq!(events.recv().await, None);
        let record = &provider.surfaces()[0];
        assert!(record.disposed);
        assert_eq!(record.delivered, 0);
    }

    #[test]
    fn records_properties_without_runtime() {
        let provider = ScriptedSurfaceProvider::new();
        let mut surface = provider.create_input_box();
        surface.set_title(Some("Create target"));
        surface.set_step(Some(2));
        surface.set_total_steps(Some(3));
        surface.set_validation_message(Some("required"));
        surface.set_validation_message(None);

        let record = &provider.surfaces()[0];
        assert_eq!(record.kind, SurfaceKind::InputBox);
        assert_eq!(record.title.as_deref(), Some("Create target"));
        assert_eq!(record.step, Some(2));
        assert_eq!(record.total_steps, Some(3));
        assert_eq!(record.validation_history, vec![Some("required".to_string()), None]);
        assert!(record.enabled);
    }
}

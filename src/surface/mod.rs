//! Interactive surfaces a flow renders its prompts on
//!
//! The flow engine never draws anything itself. It drives a surface through
//! the interfaces below and reacts to the events the surface reports:
//! - `Surface`: properties shared by choice lists and text boxes
//! - `QuickPickSurface` / `InputBoxSurface`: the two concrete kinds
//! - `SurfaceProvider`: factory the engine asks for a fresh surface per prompt
//!
//! Two backends ship with the crate: `scripted` replays predefined events
//! without user interaction, `terminal` renders prompts with dialoguer.

use tokio::sync::mpsc;

pub mod scripted;
pub mod terminal;

/// Identifies a button on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    /// Built-in navigation button, shown on every step but the first.
    Back,
    /// Caller-supplied button, by position in the prompt's button list.
    Custom(usize),
}

/// A button as the surface displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub id: ButtonId,
    pub tooltip: String,
}

impl ButtonSpec {
    pub fn back() -> Self {
        Self { id: ButtonId::Back, tooltip: "Back".to_string() }
    }
}

/// Display form of a selectable item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemView {
    pub label: String,
    pub description: Option<String>,
    pub detail: Option<String>,
}

impl ItemView {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), description: None, detail: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// User action reported by a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Choice list: the items at these positions are now selected.
    SelectionChanged(Vec<usize>),
    /// Text box: the text was edited.
    ValueChanged(String),
    /// Text box: the user submitted the current text.
    Accepted,
    ButtonTriggered(ButtonId),
    /// The surface was dismissed.
    Hidden,
    /// The backend could not interact with the user.
    Failed(String),
}

/// Sending half of a surface's event stream, held by the backend.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::UnboundedSender<SurfaceEvent>,
}

impl EventSender {
    /// Delivers `event`. Returns false once the subscriber has gone away.
    pub fn send(&self, event: SurfaceEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Receiving half of a surface's event stream.
///
/// Dropping the subscription releases it: the backend's sender observes the
/// closure and every later event is discarded.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<SurfaceEvent>,
}

impl Subscription {
    pub fn channel() -> (EventSender, Subscription) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (EventSender { sender }, Subscription { receiver })
    }

    /// Waits for the next event. `None` means the backend dropped its sender.
    pub async fn recv(&mut self) -> Option<SurfaceEvent> {
        self.receiver.recv().await
    }
}

/// Properties and lifecycle common to every surface.
pub trait Surface: Send {
    fn set_title(&mut self, title: Option<&str>);
    fn set_step(&mut self, step: Option<usize>);
    fn set_total_steps(&mut self, total_steps: Option<usize>);
    fn set_placeholder(&mut self, placeholder: Option<&str>);
    fn set_buttons(&mut self, buttons: &[ButtonSpec]);
    fn set_busy(&mut self, busy: bool);
    fn set_enabled(&mut self, enabled: bool);
    fn set_ignore_focus_out(&mut self, ignore_focus_out: bool);
    /// Opens the event stream. Called once, before `show`.
    fn subscribe(&mut self) -> Subscription;
    fn show(&mut self);
    fn dispose(&mut self);
}

/// A selectable list.
pub trait QuickPickSurface: Surface {
    fn set_items(&mut self, items: &[ItemView]);
    fn set_active_items(&mut self, indices: &[usize]);
}

/// A free-text box.
pub trait InputBoxSurface: Surface {
    fn set_value(&mut self, value: &str);
    fn set_prompt(&mut self, prompt: Option<&str>);
    fn set_validation_message(&mut self, message: Option<&str>);
}

/// Creates a fresh surface for every prompt.
pub trait SurfaceProvider: Send + Sync {
    fn create_quick_pick(&self) -> Box<dyn QuickPickSurface>;
    fn create_input_box(&self) -> Box<dyn InputBoxSurface>;
}

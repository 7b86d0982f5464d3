//! Dialoguer-based surfaces for terminal interaction
//!
//! Dialoguer prompts block, so every shown surface runs its interaction on a
//! blocking worker thread and reports the outcome as surface events.
//! - Choice lists render as `Select`; buttons are extra entries after the
//!   items and Esc dismisses the list.
//! - Text boxes render as `Input`. `:back` triggers Back, `:cancel` dismisses
//!   the box and `:<n>` triggers the n-th custom button. After a submission the
//!   worker waits until the prompt re-enables the box, then asks again.

use super::{
    ButtonId, ButtonSpec, EventSender, InputBoxSurface, ItemView, QuickPickSurface,
    Subscription, Surface, SurfaceEvent, SurfaceProvider,
};
use crate::{
    constants::terminal::{
        BACK_COMMAND, BACK_LABEL, BUTTON_COMMAND_PREFIX, CANCEL_COMMAND, RESUME_QUESTION,
    },
    prompt::ShouldResume,
};
use dialoguer::{Confirm, Input, Select};
use std::sync::mpsc;

/// Provider of dialoguer-backed surfaces.
#[derive(Debug, Default)]
pub struct TerminalSurfaceProvider;

impl TerminalSurfaceProvider {
    pub fn new() -> Self {
        Self
    }
}

impl SurfaceProvider for TerminalSurfaceProvider {
    fn create_quick_pick(&self) -> Box<dyn QuickPickSurface> {
        Box::new(TerminalQuickPick::default())
    }

    fn create_input_box(&self) -> Box<dyn InputBoxSurface> {
        Box::new(TerminalInputBox::default())
    }
}

/// Asks on the terminal whether a dismissed step should be resumed.
pub fn confirm_resume() -> ShouldResume {
    ShouldResume::new(|| async {
        let answer = tokio::task::spawn_blocking(|| {
            Confirm::new().with_prompt(RESUME_QUESTION).default(false).interact()
        })
        .await;
        match answer {
            Ok(Ok(resume)) => resume,
            // A step that cannot be confirmed is not resumed.
            Ok(Err(e)) => {
                log::error!("Failed to ask for resumption: {e}");
                false
            }
            Err(e) => {
                log::error!("Resume prompt worker failed: {e}");
                false
            }
        }
    })
}

/// Properties shared by both terminal surfaces.
#[derive(Debug, Clone, Default)]
struct Header {
    title: Option<String>,
    step: Option<usize>,
    total_steps: Option<usize>,
    placeholder: Option<String>,
    buttons: Vec<ButtonSpec>,
}

impl Header {
    fn render(&self, prompt: Option<&str>) -> String {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(title.clone());
        }
        if let (Some(step), Some(total)) = (self.step, self.total_steps) {
            parts.push(format!("[{step}/{total}]"));
        }
        if let Some(text) = prompt.or(self.placeholder.as_deref()) {
            parts.push(text.to_string());
        }
        parts.join(" ")
    }

    fn has_back(&self) -> bool {
        self.buttons.iter().any(|button| button.id == ButtonId::Back)
    }

    fn custom(&self, number: usize) -> Option<ButtonId> {
        self.buttons
            .iter()
            .filter(|button| matches!(button.id, ButtonId::Custom(_)))
            .nth(number.checked_sub(1)?)
            .map(|button| button.id)
    }
}

macro_rules! header_setters {
    () => {
        fn set_title(&mut self, title: Option<&str>) {
            self.header.title = title.map(str::to_string);
        }

        fn set_step(&mut self, step: Option<usize>) {
            self.header.step = step;
        }

        fn set_total_steps(&mut self, total_steps: Option<usize>) {
            self.header.total_steps = total_steps;
        }

        fn set_placeholder(&mut self, placeholder: Option<&str>) {
            self.header.placeholder = placeholder.map(str::to_string);
        }

        fn set_buttons(&mut self, buttons: &[ButtonSpec]) {
            self.header.buttons = buttons.to_vec();
        }

        fn set_busy(&mut self, _busy: bool) {}

        fn set_ignore_focus_out(&mut self, _ignore_focus_out: bool) {}

        fn subscribe(&mut self) -> Subscription {
            let (sender, subscription) = Subscription::channel();
            self.sender = Some(sender);
            subscription
        }
    };
}

#[derive(Default)]
struct TerminalQuickPick {
    header: Header,
    items: Vec<ItemView>,
    active: Option<usize>,
    sender: Option<EventSender>,
}

fn item_label(item: &ItemView) -> String {
    match &item.description {
        Some(description) => format!("{}  {description}", item.label),
        None => item.label.clone(),
    }
}

/// Maps the outcome of one list interaction to the event it stands for.
fn selection_event(
    header: &Header,
    item_count: usize,
    choice: dialoguer::Result<Option<usize>>,
) -> Option<SurfaceEvent> {
    match choice {
        Ok(Some(index)) if index < item_count => Some(SurfaceEvent::SelectionChanged(vec![index])),
        Ok(Some(index)) => {
            header.buttons.get(index - item_count).map(|button| SurfaceEvent::ButtonTriggered(button.id))
        }
        Ok(None) => Some(SurfaceEvent::Hidden),
        Err(e) => {
            log::error!("Terminal selection failed: {e}");
            Some(SurfaceEvent::Failed(e.to_string()))
        }
    }
}

fn run_select(header: Header, items: Vec<ItemView>, active: Option<usize>, sender: EventSender) {
    let button_labels = header.buttons.iter().map(|button| match button.id {
        ButtonId::Back => BACK_LABEL.to_string(),
        ButtonId::Custom(_) => format!("[{}]", button.tooltip),
    });
    let labels: Vec<String> = items.iter().map(item_label).chain(button_labels).collect();

    loop {
        let mut select = Select::new().with_prompt(header.render(None)).items(&labels);
        if let Some(active) = active {
            select = select.default(active);
        }
        let Some(event) = selection_event(&header, items.len(), select.interact_opt()) else {
            continue;
        };
        let settles = !matches!(event, SurfaceEvent::ButtonTriggered(ButtonId::Custom(_)));
        if !sender.send(event) || settles {
            break;
        }
    }
}

impl Surface for TerminalQuickPick {
    header_setters!();

    fn set_enabled(&mut self, _enabled: bool) {}

    fn show(&mut self) {
        if let Some(sender) = self.sender.take() {
            let header = self.header.clone();
            let items = self.items.clone();
            let active = self.active;
            tokio::task::spawn_blocking(move || run_select(header, items, active, sender));
        }
    }

    fn dispose(&mut self) {
        self.sender = None;
    }
}

impl QuickPickSurface for TerminalQuickPick {
    fn set_items(&mut self, items: &[ItemView]) {
        self.items = items.to_vec();
    }

    fn set_active_items(&mut self, indices: &[usize]) {
        self.active = indices.first().copied();
    }
}

#[derive(Default)]
struct TerminalInputBox {
    header: Header,
    value: String,
    prompt: Option<String>,
    sender: Option<EventSender>,
    rearm: Option<mpsc::Sender<()>>,
    last_message: Option<String>,
    shown: bool,
}

/// Maps a line typed into a text box to the events it stands for.
fn interpret_line(header: &Header, line: &str) -> Vec<SurfaceEvent> {
    let trimmed = line.trim();
    if trimmed == BACK_COMMAND && header.has_back() {
        return vec![SurfaceEvent::ButtonTriggered(ButtonId::Back)];
    }
    if trimmed == CANCEL_COMMAND {
        return vec![SurfaceEvent::Hidden];
    }
    if let Some(id) = trimmed
        .strip_prefix(BUTTON_COMMAND_PREFIX)
        .and_then(|number| number.parse::<usize>().ok())
        .and_then(|number| header.custom(number))
    {
        return vec![SurfaceEvent::ButtonTriggered(id)];
    }
    vec![SurfaceEvent::ValueChanged(line.to_string()), SurfaceEvent::Accepted]
}

fn line_events(header: &Header, line: dialoguer::Result<String>) -> Vec<SurfaceEvent> {
    match line {
        Ok(line) => interpret_line(header, &line),
        Err(e) => {
            log::error!("Terminal input failed: {e}");
            vec![SurfaceEvent::Failed(e.to_string())]
        }
    }
}

fn run_input(
    header: Header,
    prompt: Option<String>,
    initial: String,
    sender: EventSender,
    rearm: mpsc::Receiver<()>,
) {
    let mut value = initial;
    loop {
        let line = Input::<String>::new()
            .with_prompt(header.render(prompt.as_deref()))
            .with_initial_text(value.clone())
            .allow_empty(true)
            .interact_text();
        let events = line_events(&header, line);

        let mut wait_for_rearm = false;
        for event in events {
            match &event {
                SurfaceEvent::ValueChanged(text) => value = text.clone(),
                SurfaceEvent::Accepted => wait_for_rearm = true,
                SurfaceEvent::ButtonTriggered(ButtonId::Custom(_)) => {}
                _ => {
                    sender.send(event);
                    return;
                }
            }
            if !sender.send(event) {
                return;
            }
        }
        if wait_for_rearm && rearm.recv().is_err() {
            return;
        }
    }
}

impl Surface for TerminalInputBox {
    header_setters!();

    fn set_enabled(&mut self, enabled: bool) {
        if enabled && self.shown {
            self.last_message = None;
            if let Some(rearm) = &self.rearm {
                let _ = rearm.send(());
            }
        }
    }

    fn show(&mut self) {
        if let Some(sender) = self.sender.take() {
            let (rearm_tx, rearm_rx) = mpsc::channel();
            self.rearm = Some(rearm_tx);
            self.shown = true;
            let header = self.header.clone();
            let prompt = self.prompt.clone();
            let value = self.value.clone();
            tokio::task::spawn_blocking(move || run_input(header, prompt, value, sender, rearm_rx));
        }
    }

    fn dispose(&mut self) {
        self.shown = false;
        self.rearm = None;
        self.sender = None;
    }
}

impl InputBoxSurface for TerminalInputBox {
    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn set_prompt(&mut self, prompt: Option<&str>) {
        self.prompt = prompt.map(str::to_string);
    }

    fn set_validation_message(&mut self, message: Option<&str>) {
        let message = message.map(str::to_string);
        if let Some(text) = &message {
            if self.last_message.as_ref() != Some(text) {
                eprintln!("  ✗ {text}");
            }
        }
        self.last_message = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_with(buttons: Vec<ButtonSpec>) -> Header {
        Header {
            title: Some("New target".into()),
            step: Some(2),
            total_steps: Some(3),
            placeholder: Some("Name".into()),
            buttons,
        }
    }

    fn custom(index: usize, tooltip: &str) -> ButtonSpec {
        ButtonSpec { id: ButtonId::Custom(index), tooltip: tooltip.into() }
    }

    #[test]
    fn renders_title_position_and_prompt() {
        let header = header_with(vec![]);
        assert_eq!(header.render(None), "New target [2/3] Name");
        assert_eq!(header.render(Some("Enter a name")), "New target [2/3] Enter a name");
        assert_eq!(Header::default().render(None), "");
    }

    #[test]
    fn plain_text_is_changed_then_accepted() {
        let header = header_with(vec![]);
        assert_eq!(
            interpret_line(&header, "demo"),
            vec![SurfaceEvent::ValueChanged("demo".into()), SurfaceEvent::Accepted]
        );
    }

    #[test]
    fn back_command_requires_a_back_button() {
        let without = header_with(vec![]);
        assert_eq!(interpret_line(&without, ":back").len(), 2);

        let with = header_with(vec![ButtonSpec::back()]);
        assert_eq!(
            interpret_line(&with, ":back"),
            vec![SurfaceEvent::ButtonTriggered(ButtonId::Back)]
        );
    }

    #[test]
    fn commands_map_to_buttons_and_dismissal() {
        let header = header_with(vec![ButtonSpec::back(), custom(0, "Browse"), custom(1, "Reset")]);
        assert_eq!(interpret_line(&header, ":cancel"), vec![SurfaceEvent::Hidden]);
        assert_eq!(
            interpret_line(&header, ":2"),
            vec![SurfaceEvent::ButtonTriggered(ButtonId::Custom(1))]
        );
        // Unknown button numbers are ordinary text.
        assert_eq!(interpret_line(&header, ":9").len(), 2);
        assert_eq!(interpret_line(&header, ":0").len(), 2);
    }

    fn not_a_terminal() -> dialoguer::Error {
        dialoguer::Error::IO(std::io::Error::other("not a terminal"))
    }

    #[test]
    fn interaction_errors_are_failures_not_dismissals() {
        let header = header_with(vec![ButtonSpec::back()]);
        assert_eq!(
            line_events(&header, Err(not_a_terminal())),
            vec![SurfaceEvent::Failed("IO error: not a terminal".into())]
        );
        assert_eq!(
            selection_event(&header, 2, Err(not_a_terminal())),
            Some(SurfaceEvent::Failed("IO error: not a terminal".into()))
        );
    }

    #[test]
    fn selection_maps_items_buttons_and_escape() {
        let header = header_with(vec![ButtonSpec::back(), custom(0, "Browse")]);
        assert_eq!(selection_event(&header, 2, Ok(Some(1))), Some(SurfaceEvent::SelectionChanged(vec![1])));
        assert_eq!(
            selection_event(&header, 2, Ok(Some(3))),
            Some(SurfaceEvent::ButtonTriggered(ButtonId::Custom(0)))
        );
        assert_eq!(selection_event(&header, 2, Ok(Some(4))), None);
        assert_eq!(selection_event(&header, 2, Ok(None)), Some(SurfaceEvent::Hidden));
    }

    #[test]
    fn labels_include_descriptions() {
        assert_eq!(item_label(&ItemView::new("debug")), "debug");
        assert_eq!(
            item_label(&ItemView::new("release").with_description("optimized")),
            "release  optimized"
        );
    }
}

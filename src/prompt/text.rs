use super::{closed, dismissed, failed, InputBoxOptions, Validator};
use crate::{
    debounce::Debouncer,
    error::Result,
    flow::{engine::ActiveSurface, MultiStepInput},
    surface::SurfaceEvent,
};
use tokio::{sync::mpsc, task::JoinSet};

/// Identity of one validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValidationToken(u64);

/// Tracks the most recently issued validation request of a prompt.
///
/// Requests may complete in any order; only the result whose token is still
/// the latest may touch the displayed state.
#[derive(Debug, Default)]
pub struct ValidationRace {
    latest: u64,
}

impl ValidationRace {
    pub fn issue(&mut self) -> ValidationToken {
        self.latest += 1;
        ValidationToken(self.latest)
    }

    pub fn is_latest(&self, token: ValidationToken) -> bool {
        token.0 == self.latest
    }
}

#[derive(Debug)]
enum Purpose {
    /// Issued when the surface opens.
    Prime,
    Change,
    Submit(String),
}

#[derive(Debug)]
struct Validated {
    token: ValidationToken,
    purpose: Purpose,
    message: Option<String>,
}

/// Starts a validation of `candidate` tagged with a fresh token.
fn spawn_validation(
    validations: &mut JoinSet<Validated>,
    validate: &Validator,
    race: &mut ValidationRace,
    candidate: String,
    purpose: Purpose,
) {
    let token = race.issue();
    let pending = validate.validate(candidate);
    validations.spawn(async move {
        Validated { token, purpose, message: pending.await.filter(|m| !m.is_empty()) }
    });
}

/// Schedules removal of the displayed message, restarting any pending removal.
fn clear_later(debouncer: &mut Debouncer, clear_tx: &mpsc::UnboundedSender<()>) {
    let clear_tx = clear_tx.clone();
    debouncer.schedule_default(move || {
        let _ = clear_tx.send(());
    });
}

impl MultiStepInput {
    /// Shows a text box and resolves with the first submitted text that passes validation.
    pub async fn show_input_box(&mut self, options: InputBoxOptions) -> Result<String> {
        let InputBoxOptions {
            title,
            step,
            total_steps,
            value,
            prompt,
            placeholder,
            buttons,
            ignore_focus_out,
            validate,
            should_resume,
        } = options;

        let mut surface = self.provider().create_input_box();
        surface.set_title(title.as_deref());
        surface.set_step(Some(step));
        surface.set_total_steps(Some(total_steps));
        surface.set_value(&value);
        surface.set_prompt(prompt.as_deref());
        surface.set_placeholder(placeholder.as_deref());
        surface.set_ignore_focus_out(ignore_focus_out);
        surface.set_buttons(&self.button_specs(&buttons));

        let mut events = surface.subscribe();
        self.install(ActiveSurface::InputBox(surface));

        let mut race = ValidationRace::default();
        let mut validations = JoinSet::new();
        let mut debouncer = Debouncer::new();
        let (clear_tx, mut clear_rx) = mpsc::unbounded_channel::<()>();
        let mut text = value;
        let mut events_open = true;
        let mut pending_submits = 0usize;

        spawn_validation(&mut validations, &validate, &mut race, String::new(), Purpose::Prime);

        loop {
            tokio::select! {
                event = events.recv(), if events_open => {
                    let Some(event) = event else {
                        if pending_submits == 0 {
                            return closed();
                        }
                        log::debug!("Input box stream ended while a submission is validating");
                        events_open = false;
                        continue;
                    };
                    log::trace!("Input box event: {event:?}");
                    match event {
                        SurfaceEvent::ValueChanged(changed) => {
                            text = changed;
                            if let Some(surface) = self.input_box() {
                                surface.set_busy(true);
                            }
                            spawn_validation(
                                &mut validations,
                                &validate,
                                &mut race,
                                text.clone(),
                                Purpose::Change,
                            );
                        }
                        SurfaceEvent::Accepted => {
                            if let Some(surface) = self.input_box() {
                                surface.set_enabled(false);
                                surface.set_busy(true);
                            }
                            pending_submits += 1;
                            spawn_validation(
                                &mut validations,
                                &validate,
                                &mut race,
                                text.clone(),
                                Purpose::Submit(text.clone()),
                            );
                        }
                        SurfaceEvent::ButtonTriggered(id) => self.trigger_button(id, &buttons)?,
                        SurfaceEvent::Hidden => return Err(dismissed(&should_resume).await),
                        SurfaceEvent::Failed(reason) => return failed(reason),
                        SurfaceEvent::SelectionChanged(_) => {}
                    }
                }
                Some(joined) = validations.join_next() => {
                    let Validated { token, purpose, message } = joined.map_err(anyhow::Error::new)?;
                    match purpose {
                        Purpose::Prime => {}
                        Purpose::Change if !race.is_latest(token) => {
                            log::trace!("Discarding stale validation result {token:?}");
                        }
                        Purpose::Change => {
                            if let Some(surface) = self.input_box() {
                                surface.set_busy(false);
                                surface.set_validation_message(message.as_deref());
                            }
                            if message.is_some() {
                                clear_later(&mut debouncer, &clear_tx);
                            }
                        }
                        Purpose::Submit(submitted) => match message {
                            None => {
                                if let Some(surface) = self.input_box() {
                                    surface.set_busy(false);
                                }
                                return Ok(submitted);
                            }
                            Some(_) if !events_open && pending_submits == 1 => {
                                log::debug!("Submitted value rejected after the stream ended");
                                return closed();
                            }
                            Some(message) => {
                                pending_submits -= 1;
                                log::debug!("Submitted value rejected: {message}");
                                if let Some(surface) = self.input_box() {
                                    surface.set_validation_message(Some(message.as_str()));
                                    surface.set_enabled(true);
                                    surface.set_busy(false);
                                }
                                clear_later(&mut debouncer, &clear_tx);
                            }
                        },
                    }
                }
                Some(()) = clear_rx.recv() => {
                    if let Some(surface) = self.input_box() {
                        surface.set_validation_message(None);
                    }
                }
                else => return closed(),
            }
        }
    }
}

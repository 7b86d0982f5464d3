//! Prompts a step can show through its [`MultiStepInput`](crate::flow::MultiStepInput)
//!
//! - `interface`: options, items and callbacks, independent of any backend
//! - `choice`: `show_quick_pick`, selection from a list
//! - `text`: `show_input_box`, free text with asynchronous validation
//!
//! Both prompts settle exactly once. A selection or an accepted text resolves
//! the call; the Back button rejects it with `Back`; dismissing the surface
//! rejects it with `Resume` or `Cancel` depending on `should_resume`.

use crate::{
    error::{Error, Result},
    flow::FlowSignal,
};

pub mod choice;
pub mod interface;
pub mod text;

pub use interface::*;
pub use text::{ValidationRace, ValidationToken};

/// Maps a dismissal to the signal the flow engine should receive.
pub(crate) async fn dismissed(should_resume: &ShouldResume) -> Error {
    let signal = if should_resume.check().await {
        FlowSignal::Resume
    } else {
        FlowSignal::Cancel
    };
    log::debug!("Prompt dismissed, signalling {signal}");
    Error::Signal(signal)
}

/// Result of a prompt whose backend reported a failure.
pub(crate) fn failed<T>(reason: String) -> Result<T> {
    log::error!("Prompt surface failed: {reason}");
    Err(Error::SurfaceFailed(reason))
}

/// Result of a prompt whose event stream ended without a decision.
pub(crate) fn closed<T>() -> Result<T> {
    log::warn!("Prompt surface closed its event stream");
    Err(Error::SurfaceClosed)
}

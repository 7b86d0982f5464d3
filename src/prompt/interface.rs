//! Options and callbacks accepted by the prompt methods
//!
//! These types are independent of any surface backend.

use crate::surface::ItemView;
use std::{fmt, future::Future, pin::Pin, sync::Arc};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something a choice prompt can list and hand back once selected.
pub trait PickItem: Clone + Send + Sync + 'static {
    fn label(&self) -> String;

    fn description(&self) -> Option<String> {
        None
    }

    fn detail(&self) -> Option<String> {
        None
    }

    fn view(&self) -> ItemView {
        ItemView { label: self.label(), description: self.description(), detail: self.detail() }
    }
}

impl PickItem for String {
    fn label(&self) -> String {
        self.clone()
    }
}

impl PickItem for &'static str {
    fn label(&self) -> String {
        (*self).to_string()
    }
}

impl PickItem for ItemView {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn detail(&self) -> Option<String> {
        self.detail.clone()
    }
}

/// Asynchronous check of a text candidate. Resolves to an error message, or
/// `None` when the text is acceptable.
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(String) -> BoxFuture<'static, Option<String>> + Send + Sync>);

impl Validator {
    pub fn new<F, Fut>(validate: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        Self(Arc::new(move |candidate| -> BoxFuture<'static, Option<String>> {
            Box::pin(validate(candidate))
        }))
    }

    /// Validator accepting every input.
    pub fn accept_all() -> Self {
        Self::new(|_| async { None })
    }

    pub fn validate(&self, candidate: String) -> BoxFuture<'static, Option<String>> {
        (self.0)(candidate)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}

/// Decides, after the user dismissed a prompt, whether the flow should come
/// back to it (`true`) or be abandoned (`false`).
#[derive(Clone)]
pub struct ShouldResume(Arc<dyn Fn() -> BoxFuture<'static, bool> + Send + Sync>);

impl ShouldResume {
    pub fn new<F, Fut>(should_resume: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self(Arc::new(move || -> BoxFuture<'static, bool> { Box::pin(should_resume()) }))
    }

    pub fn always(resume: bool) -> Self {
        Self::new(move || async move { resume })
    }

    pub async fn check(&self) -> bool {
        (self.0)().await
    }
}

impl Default for ShouldResume {
    fn default() -> Self {
        Self::always(false)
    }
}

impl fmt::Debug for ShouldResume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShouldResume")
    }
}

/// Caller-supplied button. Triggering it runs `handler`; the prompt stays open.
#[derive(Clone, Default)]
pub struct PromptButton {
    pub tooltip: String,
    pub handler: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl PromptButton {
    pub fn new(tooltip: impl Into<String>) -> Self {
        Self { tooltip: tooltip.into(), handler: None }
    }

    pub fn on_trigger<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for PromptButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptButton")
            .field("tooltip", &self.tooltip)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Configuration for list selection prompts
#[derive(Debug, Clone)]
pub struct QuickPickOptions<T: PickItem> {
    pub title: Option<String>,
    /// 1-based position of this prompt in the flow.
    pub step: usize,
    pub total_steps: usize,
    pub items: Vec<T>,
    /// Item highlighted when the list opens, matched by label.
    pub active_item: Option<T>,
    pub placeholder: Option<String>,
    pub buttons: Vec<PromptButton>,
    pub ignore_focus_out: bool,
    pub should_resume: ShouldResume,
}

impl<T: PickItem> Default for QuickPickOptions<T> {
    fn default() -> Self {
        Self {
            title: None,
            step: 1,
            total_steps: 1,
            items: Vec::new(),
            active_item: None,
            placeholder: None,
            buttons: Vec::new(),
            ignore_focus_out: false,
            should_resume: ShouldResume::default(),
        }
    }
}

/// Configuration for text input prompts
#[derive(Debug, Clone)]
pub struct InputBoxOptions {
    pub title: Option<String>,
    /// 1-based position of this prompt in the flow.
    pub step: usize,
    pub total_steps: usize,
    pub value: String,
    pub prompt: Option<String>,
    pub placeholder: Option<String>,
    pub buttons: Vec<PromptButton>,
    pub ignore_focus_out: bool,
    pub validate: Validator,
    pub should_resume: ShouldResume,
}

impl Default for InputBoxOptions {
    fn default() -> Self {
        Self {
            title: None,
            step: 1,
            total_steps: 1,
            value: String::new(),
            prompt: None,
            placeholder: None,
            buttons: Vec::new(),
            ignore_focus_out: false,
            validate: Validator::default(),
            should_resume: ShouldResume::default(),
        }
    }
}

//! Transient alert state.
//!
//! The app shows at most one alert at a time. Showing a new alert replaces
//! the previous one outright, dropping its pending intents so a superseded
//! confirmation can never fire later. Confirm and dismiss hand the
//! corresponding intent back to the caller to run outside the store's
//! lock.

use std::sync::Mutex;

use crate::stores::lock_state;

/// Deferred action attached to an alert button.
pub type AlertIntent = Box<dyn FnOnce() + Send>;

/// Visual category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertKind {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
    /// Caution before a destructive step.
    Warning,
    /// Neutral notice.
    #[default]
    Info,
}

/// A request to show an alert, built by the caller.
pub struct AlertRequest {
    /// Visual category.
    pub kind: AlertKind,
    /// Headline text.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Confirm button label; defaults to "OK".
    pub confirm_text: String,
    /// Cancel button label; `None` renders a single-button alert.
    pub cancel_text: Option<String>,
    /// Runs when the user confirms.
    pub on_confirm: Option<AlertIntent>,
    /// Runs when the user cancels or dismisses.
    pub on_cancel: Option<AlertIntent>,
}

impl AlertRequest {
    /// Start an info alert with the given texts and default buttons.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            title: title.into(),
            message: message.into(),
            confirm_text: "OK".to_owned(),
            cancel_text: None,
            on_confirm: None,
            on_cancel: None,
        }
    }

    /// Set the visual category.
    #[must_use]
    pub fn kind(mut self, kind: AlertKind) -> Self {
        self.kind = kind;
        self
    }

    /// Override the confirm button label.
    #[must_use]
    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    /// Add a cancel button with the given label.
    #[must_use]
    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = Some(text.into());
        self
    }

    /// Attach a confirm intent.
    #[must_use]
    pub fn on_confirm(mut self, intent: impl FnOnce() + Send + 'static) -> Self {
        self.on_confirm = Some(Box::new(intent));
        self
    }

    /// Attach a cancel intent.
    #[must_use]
    pub fn on_cancel(mut self, intent: impl FnOnce() + Send + 'static) -> Self {
        self.on_cancel = Some(Box::new(intent));
        self
    }
}

/// Display data for the currently visible alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAlert {
    /// Visual category.
    pub kind: AlertKind,
    /// Headline text.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Confirm button label.
    pub confirm_text: String,
    /// Cancel button label, when a cancel button is shown.
    pub cancel_text: Option<String>,
}

#[derive(Default)]
struct AlertSlot {
    alert: Option<ActiveAlert>,
    on_confirm: Option<AlertIntent>,
    on_cancel: Option<AlertIntent>,
}

/// Owns the single visible alert and its pending intents.
#[derive(Default)]
pub struct NotificationStore {
    slot: Mutex<AlertSlot>,
}

impl NotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an alert, replacing any visible one and dropping its intents.
    pub fn show(&self, request: AlertRequest) {
        let mut slot = lock_state(&self.slot);
        *slot = AlertSlot {
            alert: Some(ActiveAlert {
                kind: request.kind,
                title: request.title,
                message: request.message,
                confirm_text: request.confirm_text,
                cancel_text: request.cancel_text,
            }),
            on_confirm: request.on_confirm,
            on_cancel: request.on_cancel,
        };
    }

    /// The visible alert's display data, if any.
    pub fn current(&self) -> Option<ActiveAlert> {
        lock_state(&self.slot).alert.clone()
    }

    /// Whether an alert is visible.
    pub fn is_visible(&self) -> bool {
        lock_state(&self.slot).alert.is_some()
    }

    /// Hide the alert and hand back its confirm intent for the caller to
    /// run. The cancel intent is dropped.
    pub fn confirm(&self) -> Option<AlertIntent> {
        let mut slot = lock_state(&self.slot);
        let intent = slot.on_confirm.take();
        *slot = AlertSlot::default();
        intent
    }

    /// Hide the alert and hand back its cancel intent for the caller to
    /// run. The confirm intent is dropped.
    pub fn dismiss(&self) -> Option<AlertIntent> {
        let mut slot = lock_state(&self.slot);
        let intent = slot.on_cancel.take();
        *slot = AlertSlot::default();
        intent
    }
}

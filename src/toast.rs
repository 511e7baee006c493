//! Toast notifications
//!
//! A single toast element shows the most recent message. Each `notify`
//! cancels the previous auto-dismiss timer, so an older timer can never hide
//! a newer toast; the newest message stays up for the full delay.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::timer::{Scheduler, TimerHandle};
use crate::view::ShellView;

/// Toast severity levels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToastSeverity {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastSeverity::Info => "info",
            ToastSeverity::Success => "success",
            ToastSeverity::Error => "error",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "info" => Some(ToastSeverity::Info),
            "success" => Some(ToastSeverity::Success),
            "error" => Some(ToastSeverity::Error),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastState {
    pub message: String,
    pub severity: ToastSeverity,
    pub visible: bool,
    /// Scheduler time at which the current message auto-hides
    pub dismiss_at_ms: Option<f64>,
}

impl ToastState {
    pub fn show(&mut self, message: String, severity: ToastSeverity, dismiss_at_ms: f64) {
        self.message = message;
        self.severity = severity;
        self.visible = true;
        self.dismiss_at_ms = Some(dismiss_at_ms);
    }

    /// Message and severity are kept so the fade-out still shows the text
    pub fn hide(&mut self) {
        self.visible = false;
        self.dismiss_at_ms = None;
    }

    /// e.g. `"toast success show"`
    pub fn class_name(&self) -> String {
        if self.visible {
            format!("toast {} show", self.severity.as_str())
        } else {
            format!("toast {}", self.severity.as_str())
        }
    }
}

struct ToastInner {
    state: RefCell<ToastState>,
    pending: Cell<Option<TimerHandle>>,
    scheduler: Rc<dyn Scheduler>,
    view: Rc<dyn ShellView>,
    dismiss_after_ms: u32,
}

impl ToastInner {
    fn expire(&self) {
        self.pending.set(None);
        self.state.borrow_mut().hide();
        self.view.render_toast(&self.state.borrow());
    }
}

#[derive(Clone)]
pub struct ToastPresenter {
    inner: Rc<ToastInner>,
}

impl ToastPresenter {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        view: Rc<dyn ShellView>,
        dismiss_after_ms: u32,
    ) -> Self {
        Self {
            inner: Rc::new(ToastInner {
                state: RefCell::new(ToastState::default()),
                pending: Cell::new(None),
                scheduler,
                view,
                dismiss_after_ms,
            }),
        }
    }

    /// Show `message` and schedule its auto-dismiss
    pub fn notify(&self, message: impl Into<String>, severity: ToastSeverity) {
        let inner = &self.inner;
        if let Some(previous) = inner.pending.take() {
            inner.scheduler.cancel(previous);
        }

        let message = message.into();
        tracing::debug!(severity = severity.as_str(), %message, "toast");

        let deadline = inner.scheduler.now_ms() + f64::from(inner.dismiss_after_ms);
        inner.state.borrow_mut().show(message, severity, deadline);
        inner.view.render_toast(&inner.state.borrow());

        let weak: Weak<ToastInner> = Rc::downgrade(inner);
        let handle = inner.scheduler.schedule(
            inner.dismiss_after_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.expire();
                }
            }),
        );
        inner.pending.set(Some(handle));
    }

    /// Hide now and drop the pending auto-dismiss
    pub fn dismiss(&self) {
        if let Some(handle) = self.inner.pending.take() {
            self.inner.scheduler.cancel(handle);
        }
        self.inner.expire();
    }

    pub fn state(&self) -> ToastState {
        self.inner.state.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;
    use crate::view::RecordingView;

    fn presenter() -> (ToastPresenter, Rc<ManualScheduler>, Rc<RecordingView>) {
        let scheduler = Rc::new(ManualScheduler::new());
        let view = Rc::new(RecordingView::default());
        let toasts = ToastPresenter::new(scheduler.clone(), view.clone(), 4000);
        (toasts, scheduler, view)
    }

    #[test]
    fn test_notify_renders_message_and_severity() {
        for severity in [ToastSeverity::Info, ToastSeverity::Success, ToastSeverity::Error] {
            let (toasts, _, view) = presenter();
            toasts.notify("Saved", severity);

            let rendered = view.toast.borrow().clone().unwrap();
            assert!(rendered.visible);
            assert_eq!(rendered.message, "Saved");
            assert_eq!(rendered.severity, severity);
            assert_eq!(
                rendered.class_name(),
                format!("toast {} show", severity.as_str())
            );
        }
    }

    #[test]
    fn test_auto_hides_after_delay() {
        let (toasts, scheduler, view) = presenter();
        toasts.notify("Hello", ToastSeverity::default());
        assert_eq!(toasts.state().dismiss_at_ms, Some(4000.0));

        scheduler.advance(3999.0);
        assert!(view.toast_visible());
        scheduler.advance(1.0);
        assert!(!view.toast_visible());
        assert_eq!(view.toast.borrow().as_ref().unwrap().class_name(), "toast info");
    }

    #[test]
    fn test_newer_toast_survives_older_timer() {
        let (toasts, scheduler, view) = presenter();
        toasts.notify("first", ToastSeverity::Info);
        scheduler.advance(3000.0);
        toasts.notify("second", ToastSeverity::Error);

        // First timer would have fired at 4000
        scheduler.advance(1500.0);
        assert!(view.toast_visible());
        assert_eq!(toasts.state().message, "second");

        // Second timer fires at 7000
        scheduler.advance(2500.0);
        assert!(!view.toast_visible());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_dismiss_cancels_timer() {
        let (toasts, scheduler, view) = presenter();
        toasts.notify("bye", ToastSeverity::Success);
        toasts.dismiss();

        assert!(!view.toast_visible());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_severity_from_name() {
        assert_eq!(ToastSeverity::from_name("Success"), Some(ToastSeverity::Success));
        assert_eq!(ToastSeverity::from_name(" error "), Some(ToastSeverity::Error));
        assert_eq!(ToastSeverity::from_name("warning"), None);
    }
}

//! Full-page loading overlay

use std::cell::Cell;
use std::rc::Rc;

use crate::view::ShellView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub visible: bool,
}

/// Last call wins: there is no show counter
pub struct OverlayController {
    state: Cell<OverlayState>,
    view: Rc<dyn ShellView>,
}

impl OverlayController {
    pub fn new(view: Rc<dyn ShellView>) -> Self {
        Self {
            state: Cell::new(OverlayState::default()),
            view,
        }
    }

    pub fn show(&self) {
        self.set(true);
    }

    pub fn hide(&self) {
        self.set(false);
    }

    pub fn is_visible(&self) -> bool {
        self.state.get().visible
    }

    fn set(&self, visible: bool) {
        let state = OverlayState { visible };
        self.state.set(state);
        tracing::trace!(visible, "overlay");
        self.view.render_overlay(&state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::RecordingView;

    #[test]
    fn test_show_then_hide() {
        let view = Rc::new(RecordingView::default());
        let overlay = OverlayController::new(view.clone());

        overlay.show();
        assert!(view.overlay_visible());
        overlay.hide();
        assert!(!view.overlay_visible());
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_repeated_show_is_not_counted() {
        let view = Rc::new(RecordingView::default());
        let overlay = OverlayController::new(view.clone());

        overlay.show();
        overlay.show();
        overlay.hide();
        assert!(!view.overlay_visible());
    }

    #[test]
    fn test_hide_when_hidden_still_renders() {
        let view = Rc::new(RecordingView::default());
        let overlay = OverlayController::new(view.clone());

        overlay.hide();
        assert_eq!(*view.renders.borrow(), 1);
        assert!(!view.overlay_visible());
    }
}

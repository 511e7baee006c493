//! Collapsible / responsive sidebar
//!
//! Two independent flags:
//! - `collapsed`: desktop icon-only mode, persisted across sessions
//! - `mobile_active`: temporary open state on narrow viewports, never persisted

use std::cell::Cell;
use std::rc::Rc;

use crate::storage::{read_flag, write_flag, PreferenceStore};
use crate::view::ShellView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SidebarState {
    pub collapsed: bool,
    pub mobile_active: bool,
}

/// Where a document click landed relative to the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRegion {
    Sidebar,
    MobileMenuButton,
    Outside,
}

impl SidebarState {
    /// Returns the new collapsed value
    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    pub fn toggle_mobile(&mut self) {
        self.mobile_active = !self.mobile_active;
    }

    pub fn dismiss_mobile(&mut self) {
        self.mobile_active = false;
    }

    /// Only an outside click changes anything
    pub fn apply_click(&mut self, region: ClickRegion) {
        if region == ClickRegion::Outside {
            self.dismiss_mobile();
        }
    }
}

/// Exact string comparison: `/dashboard` does not match `/dashboard/`
pub fn is_active_route(href: Option<&str>, current_path: &str) -> bool {
    href == Some(current_path)
}

pub struct SidebarController {
    state: Cell<SidebarState>,
    store: Rc<dyn PreferenceStore>,
    view: Rc<dyn ShellView>,
    storage_key: String,
}

impl SidebarController {
    pub fn new(
        store: Rc<dyn PreferenceStore>,
        view: Rc<dyn ShellView>,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            state: Cell::new(SidebarState::default()),
            store,
            view,
            storage_key: storage_key.into(),
        }
    }

    pub fn state(&self) -> SidebarState {
        self.state.get()
    }

    /// Restore the persisted collapse flag and highlight the current route
    pub fn init(&self, current_path: &str) {
        let collapsed = read_flag(self.store.as_ref(), &self.storage_key);
        self.update(|s| s.collapsed = collapsed);

        let active: Vec<bool> = self
            .view
            .nav_targets()
            .iter()
            .map(|href| is_active_route(href.as_deref(), current_path))
            .collect();
        tracing::debug!(
            path = current_path,
            active = active.iter().filter(|a| **a).count(),
            "nav items marked"
        );
        self.view.render_nav(&active);
    }

    pub fn on_toggle_click(&self) {
        let mut state = self.state.get();
        let collapsed = state.toggle_collapsed();
        self.commit(state);

        // The visual toggle stands even if persisting fails
        if let Err(e) = write_flag(self.store.as_ref(), &self.storage_key, collapsed) {
            tracing::warn!("failed to persist sidebar state: {}", e);
        }
    }

    pub fn on_mobile_menu_click(&self) {
        self.update(SidebarState::toggle_mobile);
    }

    /// Renders only when the click actually closed the mobile sidebar
    pub fn on_document_click(&self, region: ClickRegion) {
        let current = self.state.get();
        let mut next = current;
        next.apply_click(region);
        if next != current {
            self.commit(next);
        }
    }

    fn update(&self, f: impl FnOnce(&mut SidebarState)) {
        let mut state = self.state.get();
        f(&mut state);
        self.commit(state);
    }

    fn commit(&self, state: SidebarState) {
        self.state.set(state);
        self.view.render_sidebar(&state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ShellError};
    use crate::storage::MemoryStore;
    use crate::view::RecordingView;

    const KEY: &str = "sidebarCollapsed";

    fn controller(
        store: Rc<dyn PreferenceStore>,
        view: Rc<RecordingView>,
    ) -> SidebarController {
        SidebarController::new(store, view, KEY)
    }

    #[test]
    fn test_toggle_persists_and_restores() {
        let store = Rc::new(MemoryStore::new());
        let view = Rc::new(RecordingView::default());
        let sidebar = controller(store.clone(), view.clone());
        sidebar.init("/");
        assert!(!sidebar.state().collapsed);

        sidebar.on_toggle_click();
        assert!(sidebar.state().collapsed);
        assert_eq!(store.get(KEY).as_deref(), Some("true"));

        // Fresh page load
        let view = Rc::new(RecordingView::default());
        let restored = controller(store.clone(), view.clone());
        restored.init("/");
        assert!(view.sidebar.borrow().unwrap().collapsed);

        restored.on_toggle_click();
        assert_eq!(store.get(KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_mobile_toggle_leaves_collapsed_alone() {
        let store = Rc::new(MemoryStore::new());
        let view = Rc::new(RecordingView::default());
        let sidebar = controller(store.clone(), view);
        sidebar.init("/");

        sidebar.on_mobile_menu_click();
        assert_eq!(
            sidebar.state(),
            SidebarState {
                collapsed: false,
                mobile_active: true
            }
        );
        assert_eq!(store.get(KEY), None);

        sidebar.on_mobile_menu_click();
        assert!(!sidebar.state().mobile_active);
    }

    #[test]
    fn test_outside_click_closes_mobile_sidebar() {
        let view = Rc::new(RecordingView::default());
        let sidebar = controller(Rc::new(MemoryStore::new()), view.clone());
        sidebar.on_mobile_menu_click();

        sidebar.on_document_click(ClickRegion::Sidebar);
        assert!(sidebar.state().mobile_active);
        sidebar.on_document_click(ClickRegion::MobileMenuButton);
        assert!(sidebar.state().mobile_active);

        sidebar.on_document_click(ClickRegion::Outside);
        assert!(!sidebar.state().mobile_active);
        assert!(!view.sidebar.borrow().unwrap().mobile_active);

        // Idempotent, and no extra render when nothing changes
        let renders = *view.renders.borrow();
        sidebar.on_document_click(ClickRegion::Outside);
        sidebar.on_document_click(ClickRegion::Sidebar);
        assert!(!sidebar.state().mobile_active);
        assert_eq!(*view.renders.borrow(), renders);
    }

    #[test]
    fn test_active_route_exact_match() {
        let view = Rc::new(RecordingView::with_nav(&[
            Some("/dashboard"),
            Some("/profile"),
            None,
            Some("/dashboard/"),
        ]));
        let sidebar = controller(Rc::new(MemoryStore::new()), view.clone());
        sidebar.init("/dashboard");

        assert_eq!(*view.active.borrow(), vec![true, false, false, false]);
    }

    #[test]
    fn test_trailing_slash_does_not_match() {
        assert!(!is_active_route(Some("/dashboard"), "/dashboard/"));
        assert!(!is_active_route(Some("/dashboard"), "/dashboard?tab=1"));
        assert!(!is_active_route(None, "/"));
        assert!(is_active_route(Some("/"), "/"));
    }

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(ShellError::Storage("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_storage_failure_keeps_visual_toggle() {
        let view = Rc::new(RecordingView::default());
        let sidebar = controller(Rc::new(FailingStore), view.clone());

        sidebar.on_toggle_click();
        assert!(sidebar.state().collapsed);
        assert!(view.sidebar.borrow().unwrap().collapsed);
    }
}

//! Shell assembly and page lifecycle
//!
//! Owns one of each controller. All of them share a single view and
//! scheduler so that timers and rendering stay on one event loop.

use std::rc::Rc;

use crate::config::ShellConfig;
use crate::overlay::OverlayController;
use crate::session::{Confirmer, LogoutTransport, Navigator, SessionTerminator};
use crate::sidebar::SidebarController;
use crate::storage::PreferenceStore;
use crate::timer::Scheduler;
use crate::toast::ToastPresenter;
use crate::view::ShellView;

/// Mirror of `document.readyState` at the moment the shell starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// Lifecycle events that have not happened yet and still need listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLifecycle {
    pub dom_ready: bool,
    pub page_load: bool,
}

/// Host-provided collaborators
pub struct ShellDeps {
    pub view: Rc<dyn ShellView>,
    pub scheduler: Rc<dyn Scheduler>,
    pub store: Rc<dyn PreferenceStore>,
    pub confirmer: Rc<dyn Confirmer>,
    pub transport: Rc<dyn LogoutTransport>,
    pub navigator: Rc<dyn Navigator>,
}

pub struct Shell {
    pub config: Rc<ShellConfig>,
    pub toasts: ToastPresenter,
    pub overlay: Rc<OverlayController>,
    pub sidebar: SidebarController,
    pub session: SessionTerminator,
}

impl Shell {
    pub fn new(config: ShellConfig, deps: ShellDeps) -> Self {
        let config = Rc::new(config);
        let toasts = ToastPresenter::new(
            deps.scheduler.clone(),
            deps.view.clone(),
            config.toast_dismiss_ms,
        );
        let overlay = Rc::new(OverlayController::new(deps.view.clone()));
        let sidebar = SidebarController::new(
            deps.store,
            deps.view,
            config.sidebar_storage_key.clone(),
        );
        let session = SessionTerminator::new(
            toasts.clone(),
            overlay.clone(),
            deps.scheduler,
            deps.confirmer,
            deps.transport,
            deps.navigator,
            config.clone(),
        );
        Self {
            config,
            toasts,
            overlay,
            sidebar,
            session,
        }
    }

    /// Run every lifecycle step the page has already passed
    ///
    /// The wasm module can start after `DOMContentLoaded` or even after `load`
    /// has fired; those steps run here instead of waiting for an event that
    /// will never come.
    pub fn on_start(&self, ready: ReadyState, current_path: &str) -> PendingLifecycle {
        tracing::debug!(?ready, "shell starting");
        match ready {
            ReadyState::Loading => PendingLifecycle {
                dom_ready: true,
                page_load: true,
            },
            ReadyState::Interactive => {
                self.on_dom_ready(current_path);
                PendingLifecycle {
                    dom_ready: false,
                    page_load: true,
                }
            }
            ReadyState::Complete => {
                self.on_dom_ready(current_path);
                self.on_page_loaded();
                PendingLifecycle {
                    dom_ready: false,
                    page_load: false,
                }
            }
        }
    }

    /// Document parsed: restore sidebar and mark the active route
    pub fn on_dom_ready(&self, current_path: &str) {
        tracing::debug!(path = current_path, "dom ready");
        self.sidebar.init(current_path);
    }

    /// Full load: the overlay must end up hidden whatever left it showing
    pub fn on_page_loaded(&self) {
        self.overlay.hide();
    }
}

//! Dashboard shell - toasts, loading overlay, logout and sidebar for the web UI
//!
//! Controllers are plain Rust state machines behind the [`view::ShellView`],
//! [`timer::Scheduler`] and [`storage::PreferenceStore`] seams. On wasm32 the
//! [`dom`] module binds them to the page.

pub mod api;
pub mod config;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod error;
pub mod overlay;
pub mod session;
pub mod shell;
pub mod sidebar;
pub mod storage;
pub mod timer;
pub mod toast;
pub mod view;

pub use config::ShellConfig;
pub use error::ShellError;
pub use shell::{Shell, ShellDeps};
pub use toast::ToastSeverity;

#[cfg(target_arch = "wasm32")]
pub use web_entry::*;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use crate::api::ApiClient;
    use crate::config::{ShellConfig, CONFIG_ATTRIBUTE};
    use crate::dom::{install_lifecycle, BrowserNavigator, DomConfirmDialog, DomView};
    use crate::error::{Result, ShellError};
    use crate::shell::{Shell, ShellDeps};
    use crate::storage::LocalStorageStore;
    use crate::timer::WebScheduler;
    use crate::toast::ToastSeverity;

    thread_local! {
        static SHELL: RefCell<Option<Rc<Shell>>> = const { RefCell::new(None) };
    }

    fn current_shell() -> Option<Rc<Shell>> {
        let shell = SHELL.with(|s| s.borrow().clone());
        if shell.is_none() {
            tracing::warn!("dashboard shell not started");
        }
        shell
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();

        if let Err(e) = install() {
            web_sys::console::error_1(&format!("dashboard shell failed to start: {}", e).into());
        }
    }

    fn install() -> Result<()> {
        let window = web_sys::window().ok_or(ShellError::NoWindow)?;
        let document = window.document().ok_or(ShellError::NoDocument)?;

        let raw = document
            .body()
            .and_then(|body| body.get_attribute(CONFIG_ATTRIBUTE));
        let config = ShellConfig::from_attribute(raw.as_deref());

        let view = Rc::new(DomView::new(document, config.elements.clone()));
        let deps = ShellDeps {
            view: view.clone(),
            scheduler: Rc::new(WebScheduler::default()),
            store: Rc::new(LocalStorageStore),
            confirmer: Rc::new(DomConfirmDialog::new(config.elements.clone())),
            transport: Rc::new(ApiClient::new("", &config.logout_endpoint)),
            navigator: Rc::new(BrowserNavigator),
        };
        let shell = Rc::new(Shell::new(config, deps));
        SHELL.with(|s| *s.borrow_mut() = Some(shell.clone()));

        install_lifecycle(shell, view)
    }

    /// `showToast(message, type = 'info')`
    #[wasm_bindgen(js_name = showToast)]
    pub fn show_toast(message: &str, kind: Option<String>) {
        let severity = kind
            .as_deref()
            .and_then(ToastSeverity::from_name)
            .unwrap_or_default();
        if let Some(shell) = current_shell() {
            shell.toasts.notify(message, severity);
        }
    }

    #[wasm_bindgen(js_name = showLoading)]
    pub fn show_loading() {
        if let Some(shell) = current_shell() {
            shell.overlay.show();
        }
    }

    #[wasm_bindgen(js_name = hideLoading)]
    pub fn hide_loading() {
        if let Some(shell) = current_shell() {
            shell.overlay.hide();
        }
    }

    #[wasm_bindgen]
    pub fn logout() {
        let Some(shell) = current_shell() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = shell.session.logout().await;
            tracing::debug!(?outcome, "logout finished");
        });
    }
}

//! Browser bindings: DOM view, confirm dialog, navigation and event wiring

use std::rc::Rc;

use async_trait::async_trait;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, Node};

use crate::config::ElementIds;
use crate::error::{Result, ShellError};
use crate::overlay::OverlayState;
use crate::session::{Confirmer, Navigator};
use crate::shell::{ReadyState, Shell};
use crate::sidebar::{ClickRegion, SidebarState};
use crate::toast::ToastState;
use crate::view::ShellView;

fn toggle_class(element: &Element, class: &str, on: bool) {
    if let Err(e) = element.class_list().toggle_with_force(class, on) {
        tracing::warn!("classList.toggle({}) failed: {:?}", class, e);
    }
}

// =============================================================================
// DOM VIEW
// =============================================================================

pub struct DomView {
    document: Document,
    ids: ElementIds,
}

impl DomView {
    pub fn new(document: Document, ids: ElementIds) -> Self {
        Self { document, ids }
    }

    fn element(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            tracing::debug!("#{} not on this page", id);
        }
        element
    }

    fn nav_items(&self) -> Vec<Element> {
        let selector = format!(".{}", self.ids.nav_item_class);
        let Ok(list) = self.document.query_selector_all(&selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    /// `None` when there is no sidebar: outside-click dismissal is then disabled
    pub fn classify_click(&self, target: Option<&Node>) -> Option<ClickRegion> {
        let sidebar = self.document.get_element_by_id(&self.ids.sidebar)?;
        if sidebar.contains(target) {
            return Some(ClickRegion::Sidebar);
        }
        let on_button = self
            .document
            .get_element_by_id(&self.ids.mobile_menu_button)
            .is_some_and(|button| button.contains(target));
        Some(if on_button {
            ClickRegion::MobileMenuButton
        } else {
            ClickRegion::Outside
        })
    }
}

impl ShellView for DomView {
    fn render_toast(&self, state: &ToastState) {
        if let Some(toast) = self.element(&self.ids.toast) {
            toast.set_text_content(Some(&state.message));
            toast.set_class_name(&state.class_name());
        }
    }

    fn render_overlay(&self, state: &OverlayState) {
        if let Some(overlay) = self.element(&self.ids.loading_overlay) {
            toggle_class(&overlay, "show", state.visible);
        }
    }

    fn render_sidebar(&self, state: &SidebarState) {
        if let Some(sidebar) = self.element(&self.ids.sidebar) {
            toggle_class(&sidebar, "collapsed", state.collapsed);
            toggle_class(&sidebar, "mobile-active", state.mobile_active);
        }
    }

    fn nav_targets(&self) -> Vec<Option<String>> {
        self.nav_items()
            .iter()
            .map(|item| item.get_attribute("href"))
            .collect()
    }

    fn render_nav(&self, active: &[bool]) {
        for (item, is_active) in self.nav_items().iter().zip(active) {
            if *is_active {
                toggle_class(item, "active", true);
            }
        }
    }
}

// =============================================================================
// CONFIRM DIALOG
// =============================================================================

/// In-page modal when the template provides one, `window.confirm` otherwise
pub struct DomConfirmDialog {
    ids: ElementIds,
}

impl DomConfirmDialog {
    pub fn new(ids: ElementIds) -> Self {
        Self { ids }
    }

    /// `Ok(None)` when the page has no modal markup
    async fn ask_modal(&self, message: &str) -> Result<Option<bool>> {
        let document = web_sys::window()
            .ok_or(ShellError::NoWindow)?
            .document()
            .ok_or(ShellError::NoDocument)?;

        let lookup = |id: &str| -> Option<HtmlElement> {
            document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
        };
        let (Some(dialog), Some(yes), Some(no)) = (
            lookup(&self.ids.confirm_dialog),
            lookup(&self.ids.confirm_yes),
            lookup(&self.ids.confirm_no),
        ) else {
            return Ok(None);
        };

        // Re-binding the buttons would orphan the open prompt's promise
        if dialog.class_list().contains("show") {
            tracing::debug!("confirm dialog already open; declining second prompt");
            return Ok(Some(false));
        }

        if let Some(text) = document.get_element_by_id(&self.ids.confirm_message) {
            text.set_text_content(Some(message));
        }
        dialog.class_list().add_1("show")?;

        let promise = js_sys::Promise::new(&mut |resolve: js_sys::Function, _reject| {
            for (button, answer) in [(&yes, true), (&no, false)] {
                let resolve = resolve.clone();
                let handler = Closure::once_into_js(move || {
                    let _ = resolve.call1(&JsValue::NULL, &JsValue::from_bool(answer));
                });
                button.set_onclick(Some(handler.unchecked_ref()));
            }
        });
        let answer = JsFuture::from(promise).await?;

        yes.set_onclick(None);
        no.set_onclick(None);
        dialog.class_list().remove_1("show")?;
        Ok(Some(answer.as_bool().unwrap_or(false)))
    }
}

#[async_trait(?Send)]
impl Confirmer for DomConfirmDialog {
    async fn confirm(&self, message: &str) -> bool {
        match self.ask_modal(message).await {
            Ok(Some(answer)) => answer,
            Ok(None) => web_sys::window()
                .and_then(|w| w.confirm_with_message(message).ok())
                .unwrap_or(false),
            Err(e) => {
                tracing::warn!("confirm dialog failed: {}", e);
                false
            }
        }
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[derive(Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        let result = web_sys::window()
            .ok_or(ShellError::NoWindow)
            .and_then(|w| w.location().set_href(path).map_err(ShellError::from));
        if let Err(e) = result {
            tracing::error!("navigation to {} failed: {}", path, e);
        }
    }
}

// =============================================================================
// EVENT WIRING
// =============================================================================

fn on_click(target: &Element, handler: impl Fn() + 'static) -> Result<()> {
    let callback = Closure::<dyn Fn()>::new(handler);
    target.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// Sidebar and document click listeners; needs the parsed document
pub fn attach_listeners(shell: &Rc<Shell>, view: &Rc<DomView>) -> Result<()> {
    let document = web_sys::window()
        .ok_or(ShellError::NoWindow)?
        .document()
        .ok_or(ShellError::NoDocument)?;
    let ids = &shell.config.elements;

    if let Some(toggle) = document.get_element_by_id(&ids.sidebar_toggle) {
        let shell = shell.clone();
        on_click(&toggle, move || shell.sidebar.on_toggle_click())?;
    }

    if let Some(button) = document.get_element_by_id(&ids.mobile_menu_button) {
        let shell = shell.clone();
        on_click(&button, move || shell.sidebar.on_mobile_menu_click())?;
    }

    let (click_shell, click_view) = (shell.clone(), view.clone());
    let outside = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        if let Some(region) = click_view.classify_click(target.as_ref()) {
            click_shell.sidebar.on_document_click(region);
        }
    });
    document.add_event_listener_with_callback("click", outside.as_ref().unchecked_ref())?;
    outside.forget();

    tracing::info!("dashboard shell: listeners registered");
    Ok(())
}

fn ready_state(document: &Document) -> ReadyState {
    match document.ready_state().as_str() {
        "loading" => ReadyState::Loading,
        "interactive" => ReadyState::Interactive,
        _ => ReadyState::Complete,
    }
}

/// Catch up on lifecycle steps already passed, listen for the rest
pub fn install_lifecycle(shell: Rc<Shell>, view: Rc<DomView>) -> Result<()> {
    let window = web_sys::window().ok_or(ShellError::NoWindow)?;
    let document = window.document().ok_or(ShellError::NoDocument)?;
    let path = window.location().pathname()?;

    let pending = shell.on_start(ready_state(&document), &path);

    if pending.dom_ready {
        let (ready_shell, ready_view) = (shell.clone(), view);
        let ready = Closure::once_into_js(move || {
            ready_shell.on_dom_ready(&path);
            if let Err(e) = attach_listeners(&ready_shell, &ready_view) {
                tracing::error!("dom ready wiring failed: {}", e);
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
    } else {
        attach_listeners(&shell, &view)?;
    }

    if pending.page_load {
        let load_shell = shell;
        let loaded = Closure::once_into_js(move || load_shell.on_page_loaded());
        window.add_event_listener_with_callback("load", loaded.unchecked_ref())?;
    }
    Ok(())
}

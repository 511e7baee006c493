//! Rendering seam between controller state and the page
//!
//! Controllers never touch the DOM directly. They apply a pure transition to
//! their state object and hand the result to one `render_*` call.

use crate::overlay::OverlayState;
use crate::sidebar::SidebarState;
use crate::toast::ToastState;

pub trait ShellView {
    fn render_toast(&self, state: &ToastState);

    fn render_overlay(&self, state: &OverlayState);

    fn render_sidebar(&self, state: &SidebarState);

    /// Link target of each nav item in document order (`None` when it has no href)
    fn nav_targets(&self) -> Vec<Option<String>>;

    /// Active flag per nav item, same order as [`ShellView::nav_targets`]
    fn render_nav(&self, active: &[bool]);
}

#[cfg(test)]
pub(crate) use recording::RecordingView;

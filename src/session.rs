//! Logout flow
//!
//! confirm -> overlay -> POST logout -> toast -> delayed redirect.
//! A declined confirmation changes nothing and sends nothing.

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::config::{NonSuccessPolicy, ShellConfig};
use crate::error::Result;
use crate::overlay::OverlayController;
use crate::timer::Scheduler;
use crate::toast::{ToastPresenter, ToastSeverity};

/// Yes/no prompt that does not block the event loop
#[async_trait(?Send)]
pub trait Confirmer {
    async fn confirm(&self, message: &str) -> bool;
}

#[async_trait(?Send)]
pub trait LogoutTransport {
    /// HTTP status of the logout response; `Err` only for transport failures
    async fn post_logout(&self) -> Result<u16>;
}

pub trait Navigator {
    fn navigate(&self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    Declined,
    /// Success toast shown, redirect scheduled
    LoggedOut,
    TransportFailed,
    /// Non-2xx response; handling depends on [`NonSuccessPolicy`]
    Rejected { status: u16 },
    /// Another logout is still prompting or waiting on the server
    AlreadyInProgress,
}

/// Clears the in-progress flag on every exit path
struct InProgress<'a>(&'a Cell<bool>);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct SessionTerminator {
    toasts: ToastPresenter,
    overlay: Rc<OverlayController>,
    scheduler: Rc<dyn Scheduler>,
    confirmer: Rc<dyn Confirmer>,
    transport: Rc<dyn LogoutTransport>,
    navigator: Rc<dyn Navigator>,
    config: Rc<ShellConfig>,
    in_progress: Cell<bool>,
}

impl SessionTerminator {
    pub fn new(
        toasts: ToastPresenter,
        overlay: Rc<OverlayController>,
        scheduler: Rc<dyn Scheduler>,
        confirmer: Rc<dyn Confirmer>,
        transport: Rc<dyn LogoutTransport>,
        navigator: Rc<dyn Navigator>,
        config: Rc<ShellConfig>,
    ) -> Self {
        Self {
            toasts,
            overlay,
            scheduler,
            confirmer,
            transport,
            navigator,
            config,
            in_progress: Cell::new(false),
        }
    }

    pub async fn logout(&self) -> LogoutOutcome {
        if self.in_progress.replace(true) {
            tracing::debug!("logout already in progress");
            return LogoutOutcome::AlreadyInProgress;
        }
        let _guard = InProgress(&self.in_progress);

        let messages = &self.config.messages;
        if !self.confirmer.confirm(&messages.logout_confirm).await {
            tracing::debug!("logout declined");
            return LogoutOutcome::Declined;
        }

        self.overlay.show();

        let status = match self.transport.post_logout().await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("logout request failed: {}", e);
                self.overlay.hide();
                self.toasts
                    .notify(messages.logout_failure.clone(), ToastSeverity::Error);
                return LogoutOutcome::TransportFailed;
            }
        };

        if !(200..300).contains(&status) {
            match self.config.non_success_policy {
                NonSuccessPolicy::Ignore => {
                    tracing::warn!(status, "logout rejected by server; leaving page as is");
                }
                NonSuccessPolicy::TreatAsFailure => {
                    tracing::warn!(status, "logout rejected by server");
                    self.overlay.hide();
                    self.toasts
                        .notify(messages.logout_failure.clone(), ToastSeverity::Error);
                }
            }
            return LogoutOutcome::Rejected { status };
        }

        tracing::info!(status, "logged out");
        // Overlay stays up; the redirect unloads the page.
        self.toasts
            .notify(messages.logout_success.clone(), ToastSeverity::Success);

        let navigator = self.navigator.clone();
        let target = self.config.redirect_path.clone();
        self.scheduler.schedule(
            self.config.redirect_delay_ms,
            Box::new(move || navigator.navigate(&target)),
        );
        LogoutOutcome::LoggedOut
    }
}

//! Shell configuration
//!
//! Every field has a default matching the stock dashboard templates, so an
//! absent or partial `data-shell-config` attribute is always valid.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Attribute on `<body>` carrying a JSON [`ShellConfig`]
pub const CONFIG_ATTRIBUTE: &str = "data-shell-config";

/// What the logout flow does with a response outside 2xx
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonSuccessPolicy {
    /// Leave the overlay up and show nothing (legacy behavior), but log it
    #[default]
    Ignore,
    /// Hide the overlay and show the failure toast
    TreatAsFailure,
}

/// DOM element IDs and the nav item class the shell binds to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub toast: String,
    pub loading_overlay: String,
    pub sidebar: String,
    pub sidebar_toggle: String,
    pub mobile_menu_button: String,
    pub nav_item_class: String,
    pub confirm_dialog: String,
    pub confirm_message: String,
    pub confirm_yes: String,
    pub confirm_no: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            toast: "toast".to_string(),
            loading_overlay: "loading-overlay".to_string(),
            sidebar: "sidebar".to_string(),
            sidebar_toggle: "sidebar-toggle".to_string(),
            mobile_menu_button: "mobile-menu-btn".to_string(),
            nav_item_class: "nav-item".to_string(),
            confirm_dialog: "confirm-dialog".to_string(),
            confirm_message: "confirm-message".to_string(),
            confirm_yes: "confirm-yes".to_string(),
            confirm_no: "confirm-no".to_string(),
        }
    }
}

/// User-facing text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub logout_confirm: String,
    pub logout_success: String,
    pub logout_failure: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            logout_confirm: "Are you sure you want to logout?".to_string(),
            logout_success: "Logged out successfully".to_string(),
            logout_failure: "Logout failed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub elements: ElementIds,
    pub messages: Messages,
    /// localStorage key holding `"true"` / `"false"`
    pub sidebar_storage_key: String,
    pub logout_endpoint: String,
    pub redirect_path: String,
    pub toast_dismiss_ms: u32,
    pub redirect_delay_ms: u32,
    pub non_success_policy: NonSuccessPolicy,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            messages: Messages::default(),
            sidebar_storage_key: "sidebarCollapsed".to_string(),
            logout_endpoint: "/api/logout".to_string(),
            redirect_path: "/".to_string(),
            toast_dismiss_ms: 4000,
            redirect_delay_ms: 800,
            non_success_policy: NonSuccessPolicy::Ignore,
        }
    }
}

impl ShellConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse an optional attribute value, falling back to defaults on absence or error
    pub fn from_attribute(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(raw) => Self::from_json(raw).unwrap_or_else(|e| {
                tracing::warn!("ignoring {}: {}", CONFIG_ATTRIBUTE, e);
                Self::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_templates() {
        let config = ShellConfig::default();
        assert_eq!(config.elements.toast, "toast");
        assert_eq!(config.elements.mobile_menu_button, "mobile-menu-btn");
        assert_eq!(config.sidebar_storage_key, "sidebarCollapsed");
        assert_eq!(config.logout_endpoint, "/api/logout");
        assert_eq!(config.toast_dismiss_ms, 4000);
        assert_eq!(config.redirect_delay_ms, 800);
        assert_eq!(config.non_success_policy, NonSuccessPolicy::Ignore);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = ShellConfig::from_json(
            r#"{"redirect_path": "/login", "non_success_policy": "treat_as_failure",
                "elements": {"toast": "flash"}}"#,
        )
        .unwrap();

        assert_eq!(config.redirect_path, "/login");
        assert_eq!(config.non_success_policy, NonSuccessPolicy::TreatAsFailure);
        assert_eq!(config.elements.toast, "flash");
        assert_eq!(config.elements.sidebar, "sidebar");
        assert_eq!(config.messages.logout_failure, "Logout failed");
    }

    #[test]
    fn test_malformed_attribute_falls_back() {
        assert_eq!(
            ShellConfig::from_attribute(Some("{not json")),
            ShellConfig::default()
        );
        assert_eq!(ShellConfig::from_attribute(Some("  ")), ShellConfig::default());
        assert_eq!(ShellConfig::from_attribute(None), ShellConfig::default());
    }
}

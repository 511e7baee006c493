//! API client for backend communication
//!
//! Uses web-sys fetch for WASM, reqwest for native.

use async_trait::async_trait;

use crate::error::{Result, ShellError};
use crate::session::LogoutTransport;

/// Logout client
///
/// On native targets the reqwest path must be awaited inside a Tokio runtime.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    logout_path: String,
}

impl ApiClient {
    pub fn new(base_url: &str, logout_path: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            logout_path: logout_path.to_string(),
        }
    }

    /// POST with no body; returns the HTTP status, body is not read
    #[cfg(target_arch = "wasm32")]
    pub async fn post_empty(&self, path: &str) -> Result<u16> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, RequestMode, Response};

        let url = format!("{}{}", self.base_url, path);

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::SameOrigin);

        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| ShellError::Transport(format!("request error: {:?}", e)))?;

        let window = web_sys::window().ok_or(ShellError::NoWindow)?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ShellError::Transport(format!("fetch error: {:?}", e)))?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ShellError::Transport("response is not a Response".to_string()))?;

        Ok(resp.status())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub async fn post_empty(&self, path: &str) -> Result<u16> {
        let url = format!("{}{}", self.base_url, path);

        let client = reqwest::Client::new();
        let response = client
            .post(&url)
            .send()
            .await
            .map_err(|e| ShellError::Transport(e.to_string()))?;

        Ok(response.status().as_u16())
    }
}

#[async_trait(?Send)]
impl LogoutTransport for ApiClient {
    async fn post_logout(&self) -> Result<u16> {
        tracing::debug!("POST {}", self.logout_path);
        self.post_empty(&self.logout_path).await
    }
}

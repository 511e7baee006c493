//! Error type shared by every shell component

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("no global window")]
    NoWindow,

    #[error("no document on window")]
    NoDocument,

    #[error("element not found: #{0}")]
    MissingElement(String),

    /// Stringified `JsValue` from a failed browser call
    #[error("js error: {0}")]
    Js(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid shell config: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for ShellError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        ShellError::Js(format!("{:?}", value))
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;

use flexdom_core::FlexError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Error type produced by the web backend.
#[derive(Debug, Clone, Error)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    #[error("DOM is not available")]
    DomUnavailable,
    /// Mounting or rendering failed.
    #[error(transparent)]
    Core(#[from] FlexError),
    /// Wrapper around JavaScript exceptions.
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(describe(&value))
    }
}

impl From<WebError> for JsValue {
    fn from(value: WebError) -> Self {
        Self::from(value.to_string())
    }
}

/// Converts a JavaScript exception raised by a host call.
pub(crate) fn host_error(value: &JsValue) -> FlexError {
    FlexError::Host(describe(value))
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

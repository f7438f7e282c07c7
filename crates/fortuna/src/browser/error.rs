//! Failures while attaching to the page.

use thiserror::Error;

/// The page is missing something the adapter needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
    /// No global `window`
    #[error("no window")]
    NoWindow,

    /// No `document` or no `document.body`
    #[error("no document body")]
    NoDocument,

    /// The mounting element does not exist
    #[error("element '{id}' not found")]
    MissingElement {
        /// Element id looked up
        id: String,
    },

    /// A DOM call failed
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

#[cfg(target_arch = "wasm32")]
impl From<MountError> for wasm_bindgen::JsValue {
    fn from(err: MountError) -> Self {
        Self::from_str(&err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for MountError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

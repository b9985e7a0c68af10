//! Crate-wide error type.

/// Error returned by fallible viewer operations.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The asset URL's extension does not map to a known loader.
    #[error("unsupported asset format: {0}")]
    UnsupportedFormat(String),
    /// The external loader failed to produce a scene graph.
    #[error("asset load failed: {0}")]
    Load(String),
    /// A host option is out of range.
    #[error("invalid viewer config: {0}")]
    InvalidConfig(String),
    /// The host options object is not valid JSON for [`crate::config::ViewerConfig`].
    #[error("failed to parse viewer config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    /// The renderer failed while drawing the capture frame.
    #[error("render failed: {0}")]
    Render(String),
    /// The renderer failed to encode the canvas to an image.
    #[error("capture encode failed: {0}")]
    Encode(String),
    /// State could not be encoded for the host.
    #[error("failed to serialize {what}: {source}")]
    Serialize { what: &'static str, source: serde_json::Error },
    /// A browser API call failed or was unavailable.
    #[error("browser API unavailable: {0}")]
    Host(String),
}

impl ViewerError {
    /// Wrap a failed JS call, keeping the thrown value's debug text.
    #[must_use]
    pub fn host(what: &str, value: &wasm_bindgen::JsValue) -> Self {
        Self::Host(format!("{what}: {value:?}"))
    }
}

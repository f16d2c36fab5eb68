//! Errors raised while mounting or driving the patcher from JavaScript.

use patch_canvas::CanvasError;
use wasm_bindgen::JsValue;

/// Error surfaced to the JS host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// `window` or `document` is unavailable (not running in a page).
    #[error("no browser document available")]
    NoDocument,
    /// The container id passed to `mount` names no element.
    #[error("no element with id `{0}`")]
    MissingContainer(String),
    /// `set_mode` was given a name other than `wire` or `module`.
    #[error("unknown mode `{0}`, expected `wire` or `module`")]
    UnknownMode(String),
    /// The patcher is already handling an event.
    #[error("patcher is busy")]
    Busy,
    /// A DOM call failed.
    #[error("DOM call `{op}` failed: {message}")]
    Dom { op: &'static str, message: String },
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

impl HostError {
    pub(crate) fn dom(op: &'static str, err: &JsValue) -> Self {
        Self::Dom { op, message: describe(err) }
    }
}

impl From<patch_canvas::ConfigError> for HostError {
    fn from(err: patch_canvas::ConfigError) -> Self {
        Self::Canvas(err.into())
    }
}

impl From<patch_canvas::SurfaceError> for HostError {
    fn from(err: patch_canvas::SurfaceError) -> Self {
        Self::Canvas(err.into())
    }
}

impl From<HostError> for JsValue {
    fn from(err: HostError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

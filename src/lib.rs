//! Browser host for the modular synth patcher.
//!
//! Compiled to WebAssembly. [`Patcher::mount`] draws a `patch_canvas` grid
//! into an SVG element, wires DOM pointer events to the compositor, and
//! hands applied edits to an optional JS callback as JSON.
//!
//! ```js
//! const patcher = Patcher.mount("patch", JSON.stringify({ width: 24, height: 16 }));
//! patcher.set_action_listener((json) => console.log(JSON.parse(json)));
//! patcher.set_mode("wire");
//! ```

pub mod error;
pub mod events;
pub mod patcher;
pub mod svg;

use std::sync::Once;

pub use error::HostError;
pub use patcher::Patcher;

static LOGGING: Once = Once::new();

/// Route panics and `tracing` events (through the `log` facade) to the
/// browser console.
fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
        if let Err(err) = console_log::init_with_level(level) {
            tracing::debug!(error = %err, "console logger already installed");
        }
    });
}

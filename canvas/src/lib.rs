//! Grid model and interaction engine for the modular synth patcher.
//!
//! The crate has no browser dependency. A host supplies a [`surface::RenderSurface`]
//! (the web build draws into SVG), feeds pointer events to [`ui::Ui`] in surface
//! coordinates, and forwards the returned [`handler::Action`]s to whoever keeps
//! the patch.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`ui`] | Compositor: mode controls and dispatch to the active handler |
//! | [`wire`] | Wire segment storage and drag-to-paint |
//! | [`module`] | Module placement, collision, and the placement guide |
//! | [`handler`] | The handler trait and the actions handlers report |
//! | [`grid`] | Cell/pixel geometry and path traversal |
//! | [`input`] | Pointer events, modes, and the drag state machine |
//! | [`surface`] | Rendering interface plus an in-memory surface |
//! | [`config`] | Host-supplied grid configuration |
//! | [`error`] | Error types |
//! | [`consts`] | Default sizes, layout, and colors |

pub mod config;
pub mod consts;
pub mod error;
pub mod grid;
pub mod handler;
pub mod input;
pub mod module;
pub mod surface;
pub mod ui;
pub mod wire;

pub use config::GridConfig;
pub use error::{CanvasError, ConfigError, SurfaceError};
pub use handler::{Action, GridHandler};
pub use input::{Button, Mode, PointerEvent};
pub use surface::RenderSurface;
pub use ui::Ui;

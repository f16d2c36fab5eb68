//! The JS-facing patcher: mounts an SVG grid into a page element and routes
//! its pointer events through the compositor.

#[cfg(test)]
#[path = "patcher_test.rs"]
mod patcher_test;

use std::cell::RefCell;
use std::rc::Rc;

use patch_canvas::consts::{CONTROL_GAP, CONTROL_WIDTH, CONTROL_X};
use patch_canvas::{Action, GridConfig, Mode, Ui};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::error::{HostError, describe};
use crate::events::{PointerKind, surface_event};
use crate::svg::SvgSurface;

/// Pixel size of the surface for `config`: the grid plus its origin offset,
/// with the origin's x margin repeated on the right and bottom, and wide
/// enough for the mode controls.
pub fn surface_size(config: &GridConfig) -> (f64, f64) {
    let margin = config.origin_x.max(0.0);
    let grid_right = config.origin_x + f64::from(config.width) * config.scale + margin;
    let controls_right = CONTROL_X + 2.0 * CONTROL_WIDTH + CONTROL_GAP + CONTROL_X;
    let bottom = config.origin_y + f64::from(config.height) * config.scale + margin;
    (grid_right.max(controls_right), bottom)
}

/// State shared between the `Patcher` and its DOM listeners.
struct Shared {
    ui: RefCell<Ui<SvgSurface>>,
    listener: RefCell<Option<js_sys::Function>>,
    root: Element,
}

impl Shared {
    fn dispatch(&self, kind: PointerKind, dom: &web_sys::PointerEvent) {
        let bounds = self.root.get_bounding_client_rect();
        let event = surface_event(dom.client_x(), dom.client_y(), bounds.left(), bounds.top(), dom.button());
        if kind == PointerKind::Down {
            dom.prevent_default();
            if let Err(err) = self.root.set_pointer_capture(dom.pointer_id()) {
                tracing::debug!(error = %describe(&err), "pointer capture unavailable");
            }
        }

        let result = {
            let Ok(mut ui) = self.ui.try_borrow_mut() else {
                tracing::warn!(kind = kind.dom_name(), "patcher busy, dropping event");
                return;
            };
            match kind {
                PointerKind::Down => ui.on_pointer_down(&event),
                PointerKind::Move => ui.on_pointer_move(&event),
                PointerKind::Up | PointerKind::Cancel => ui.on_pointer_up(&event),
                PointerKind::Leave => ui.on_pointer_leave().map(|()| Vec::new()),
            }
        };
        match result {
            Ok(actions) => self.emit(&actions),
            Err(err) => tracing::warn!(kind = kind.dom_name(), error = %err, "pointer event failed"),
        }
    }

    /// Forward actions to the JS listener as JSON strings.
    fn emit(&self, actions: &[Action]) {
        if actions.is_empty() {
            return;
        }
        let Some(listener) = self.listener.borrow().clone() else {
            return;
        };
        for action in actions {
            let json = match serde_json::to_string(action) {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to encode action");
                    continue;
                }
            };
            if let Err(err) = listener.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                tracing::warn!(error = %describe(&err), "action listener threw");
            }
        }
    }
}

type PointerClosure = Closure<dyn FnMut(web_sys::PointerEvent)>;

/// A mounted patch grid. Dropping it (JS `free()`) removes it from the page.
#[wasm_bindgen]
pub struct Patcher {
    shared: Rc<Shared>,
    listeners: Vec<(PointerKind, PointerClosure)>,
}

impl Patcher {
    fn try_mount(container_id: &str, config_json: Option<&str>) -> Result<Self, HostError> {
        crate::init_logging();
        let config = match config_json {
            Some(json) => GridConfig::from_json(json)?,
            None => GridConfig::default(),
        };
        config.validate()?;

        let document = web_sys::window().and_then(|w| w.document()).ok_or(HostError::NoDocument)?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| HostError::MissingContainer(container_id.to_string()))?;

        let (width, height) = surface_size(&config);
        let surface = SvgSurface::new(&document, &container, width, height)?;
        let root = surface.root().clone();
        let ui = match Ui::new(&config, surface) {
            Ok(ui) => ui,
            Err(err) => {
                root.remove();
                return Err(err.into());
            }
        };

        let shared = Rc::new(Shared { ui: RefCell::new(ui), listener: RefCell::new(None), root });
        let mut patcher = Self { shared, listeners: Vec::new() };
        patcher.listen()?;
        tracing::info!(container = container_id, "patcher mounted");
        Ok(patcher)
    }

    fn listen(&mut self) -> Result<(), HostError> {
        for kind in PointerKind::ALL {
            let shared = Rc::clone(&self.shared);
            let closure = PointerClosure::new(move |ev: web_sys::PointerEvent| shared.dispatch(kind, &ev));
            self.shared
                .root
                .add_event_listener_with_callback(kind.dom_name(), closure.as_ref().unchecked_ref())
                .map_err(|e| HostError::dom("addEventListener", &e))?;
            self.listeners.push((kind, closure));
        }
        Ok(())
    }

    fn try_set_mode(&self, name: &str) -> Result<(), HostError> {
        let mode = Mode::from_name(name).ok_or_else(|| HostError::UnknownMode(name.to_string()))?;
        let actions = {
            let mut ui = self.shared.ui.try_borrow_mut().map_err(|_| HostError::Busy)?;
            ui.set_mode(mode)?
        };
        self.shared.emit(&actions);
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Ui<SvgSurface>) -> T) -> Result<T, HostError> {
        let ui = self.shared.ui.try_borrow().map_err(|_| HostError::Busy)?;
        Ok(f(&ui))
    }
}

#[wasm_bindgen]
impl Patcher {
    /// Mount a grid into the element with id `container_id`. `config_json`
    /// is an optional, possibly partial, grid config object.
    ///
    /// # Errors
    ///
    /// Throws if the config is invalid, the container is missing, or the DOM
    /// rejects the scene.
    pub fn mount(container_id: &str, config_json: Option<String>) -> Result<Patcher, JsValue> {
        Ok(Self::try_mount(container_id, config_json.as_deref())?)
    }

    /// Activate `"wire"` or `"module"` mode.
    ///
    /// # Errors
    ///
    /// Throws on an unknown mode name or a rendering failure.
    pub fn set_mode(&self, mode: &str) -> Result<(), JsValue> {
        Ok(self.try_set_mode(mode)?)
    }

    /// The active mode name.
    ///
    /// # Errors
    ///
    /// Throws if called from inside an action listener.
    pub fn mode(&self) -> Result<String, JsValue> {
        let mode = self.read(Ui::mode)?;
        Ok(mode.label().to_lowercase())
    }

    /// Number of painted wire segments.
    ///
    /// # Errors
    ///
    /// Throws if called from inside an action listener.
    pub fn wire_count(&self) -> Result<usize, JsValue> {
        Ok(self.read(|ui| ui.wires().len())?)
    }

    /// Number of placed modules.
    ///
    /// # Errors
    ///
    /// Throws if called from inside an action listener.
    pub fn module_count(&self) -> Result<usize, JsValue> {
        Ok(self.read(|ui| ui.modules().len())?)
    }

    /// Receive every applied edit as a JSON string. Pass `undefined` to stop.
    pub fn set_action_listener(&self, listener: Option<js_sys::Function>) {
        *self.shared.listener.borrow_mut() = listener;
    }
}

impl Drop for Patcher {
    fn drop(&mut self) {
        for (kind, closure) in self.listeners.drain(..) {
            let removed = self
                .shared
                .root
                .remove_event_listener_with_callback(kind.dom_name(), closure.as_ref().unchecked_ref());
            if let Err(err) = removed {
                tracing::warn!(kind = kind.dom_name(), error = %describe(&err), "failed to remove listener");
            }
        }
        self.shared.root.remove();
        tracing::info!("patcher unmounted");
    }
}

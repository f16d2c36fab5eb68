//! SVG rendering surface.
//!
//! One `<svg>` root holds a `<g>` per [`Layer`] in draw order, so primitives
//! created later on a lower layer still render underneath higher layers.
//! Handles are the created elements themselves.

use patch_canvas::grid::Point;
use patch_canvas::surface::{FillStyle, Layer, LineStyle, Rect, RenderSurface, TextStyle};
use patch_canvas::SurfaceError;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::error::describe;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn backend(op: &'static str, err: &JsValue) -> SurfaceError {
    SurfaceError::Backend { op, message: describe(err) }
}

fn set(el: &Element, name: &str, value: &str) -> Result<(), SurfaceError> {
    el.set_attribute(name, value).map_err(|e| backend("set attribute", &e))
}

fn set_num(el: &Element, name: &str, value: f64) -> Result<(), SurfaceError> {
    set(el, name, &value.to_string())
}

fn apply_rect(el: &Element, rect: Rect, style: &FillStyle) -> Result<(), SurfaceError> {
    set_num(el, "x", rect.x)?;
    set_num(el, "y", rect.y)?;
    set_num(el, "width", rect.width)?;
    set_num(el, "height", rect.height)?;
    set(el, "fill", &style.fill.to_css())?;
    match style.stroke {
        Some(color) => set(el, "stroke", &color.to_css()),
        None => set(el, "stroke", "none"),
    }
}

/// A retained SVG scene inside a host container.
pub struct SvgSurface {
    document: Document,
    root: Element,
    layers: Vec<(Layer, Element)>,
}

impl SvgSurface {
    /// Append a `width` x `height` `<svg>` with its layer groups to `container`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any element cannot be created or attached.
    pub fn new(document: &Document, container: &Element, width: f64, height: f64) -> Result<Self, SurfaceError> {
        let root = document.create_element_ns(Some(SVG_NS), "svg").map_err(|e| backend("create svg", &e))?;
        set_num(&root, "width", width)?;
        set_num(&root, "height", height)?;
        set(&root, "viewBox", &format!("0 0 {width} {height}"))?;
        set(&root, "style", "touch-action: none; user-select: none")?;

        let mut layers = Vec::with_capacity(Layer::ALL.len());
        for layer in Layer::ALL {
            let group = document.create_element_ns(Some(SVG_NS), "g").map_err(|e| backend("create layer", &e))?;
            set(&group, "class", &format!("layer-{}", layer.name()))?;
            if layer == Layer::Guide {
                set(&group, "pointer-events", "none")?;
            }
            root.append_child(&group).map_err(|e| backend("attach layer", &e))?;
            layers.push((layer, group));
        }
        container.append_child(&root).map_err(|e| backend("attach svg", &e))?;
        tracing::debug!(width, height, "svg surface attached");
        Ok(Self { document: document.clone(), root, layers })
    }

    /// The `<svg>` element pointer listeners attach to.
    pub fn root(&self) -> &Element {
        &self.root
    }

    fn element(&self, tag: &str) -> Result<Element, SurfaceError> {
        self.document.create_element_ns(Some(SVG_NS), tag).map_err(|e| backend("create element", &e))
    }

    fn attach(&self, layer: Layer, el: Element) -> Result<Element, SurfaceError> {
        let Some((_, group)) = self.layers.iter().find(|(l, _)| *l == layer) else {
            return Err(SurfaceError::Backend { op: "attach", message: format!("missing layer {}", layer.name()) });
        };
        group.append_child(&el).map_err(|e| backend("attach", &e))?;
        Ok(el)
    }
}

impl RenderSurface for SvgSurface {
    type Handle = Element;

    fn create_line(&mut self, layer: Layer, from: Point, to: Point, style: &LineStyle) -> Result<Element, SurfaceError> {
        let el = self.element("line")?;
        set_num(&el, "x1", from.x)?;
        set_num(&el, "y1", from.y)?;
        set_num(&el, "x2", to.x)?;
        set_num(&el, "y2", to.y)?;
        set(&el, "stroke", &style.color.to_css())?;
        set_num(&el, "stroke-width", style.width)?;
        if style.round_caps {
            set(&el, "stroke-linecap", "round")?;
        }
        self.attach(layer, el)
    }

    fn create_rect(&mut self, layer: Layer, rect: Rect, style: &FillStyle) -> Result<Element, SurfaceError> {
        let el = self.element("rect")?;
        apply_rect(&el, rect, style)?;
        self.attach(layer, el)
    }

    fn create_text(&mut self, layer: Layer, anchor: Point, text: &str, style: &TextStyle) -> Result<Element, SurfaceError> {
        let el = self.element("text")?;
        set_num(&el, "x", anchor.x)?;
        set_num(&el, "y", anchor.y)?;
        set(&el, "fill", &style.color.to_css())?;
        set_num(&el, "font-size", style.size)?;
        set(&el, "font-family", "sans-serif")?;
        set(&el, "text-anchor", "middle")?;
        set(&el, "dominant-baseline", "central")?;
        set(&el, "pointer-events", "none")?;
        el.set_text_content(Some(text));
        self.attach(layer, el)
    }

    fn update_rect(&mut self, handle: &Element, rect: Rect, style: &FillStyle) -> Result<(), SurfaceError> {
        if handle.parent_node().is_none() {
            return Err(SurfaceError::UnknownHandle);
        }
        apply_rect(handle, rect, style)
    }

    fn remove(&mut self, handle: Element) -> Result<(), SurfaceError> {
        if handle.parent_node().is_none() {
            return Err(SurfaceError::UnknownHandle);
        }
        handle.remove();
        Ok(())
    }
}

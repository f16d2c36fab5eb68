//! Rendering-surface abstraction and a headless in-memory implementation.
//!
//! The interaction core never draws directly. It asks a [`RenderSurface`] to
//! create, update, and remove retained primitives (lines, rectangles, text)
//! and holds on to the returned handles. The browser host implements the trait
//! over SVG elements; [`MemorySurface`] records primitives for tests and
//! headless hosts.
//!
//! Primitives live in one of a fixed set of [`Layer`]s. Layers are drawn in
//! declaration order, so a wire always sits above the grid lines and the
//! placement guide above every module.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::SurfaceError;
use crate::grid::Point;

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f64,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string: `#rrggbb` when opaque, `rgba(...)` otherwise.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

/// Stroke style for line primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub round_caps: bool,
}

/// Fill style for rectangle primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub fill: Color,
    pub stroke: Option<Color>,
}

impl FillStyle {
    #[must_use]
    pub fn solid(fill: Color) -> Self {
        Self { fill, stroke: None }
    }
}

/// Style for text primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    /// Font size in pixels.
    pub size: f64,
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `pt` lies inside, edges included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    /// Whether the two rectangles share any point, edges included.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Draw-order bucket for primitives, bottom first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Background grid lines.
    Grid,
    /// Painted wire segments.
    Wires,
    /// Placed modules.
    Modules,
    /// Placement preview outline.
    Guide,
    /// Mode buttons.
    Controls,
}

impl Layer {
    /// All layers in draw order.
    pub const ALL: [Layer; 5] = [Self::Grid, Self::Wires, Self::Modules, Self::Guide, Self::Controls];

    /// Stable name, used as an element id suffix by the SVG host.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Wires => "wires",
            Self::Modules => "modules",
            Self::Guide => "guide",
            Self::Controls => "controls",
        }
    }
}

/// A retained-mode drawing target.
///
/// Every `create_*` call attaches a new primitive to `layer` above the layer's
/// existing primitives and returns a handle that stays valid until passed to
/// [`RenderSurface::remove`].
pub trait RenderSurface {
    /// Opaque reference to a live primitive.
    type Handle: Clone + Debug;

    /// Create a line between two points.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend cannot create or attach the primitive.
    fn create_line(&mut self, layer: Layer, from: Point, to: Point, style: &LineStyle)
    -> Result<Self::Handle, SurfaceError>;

    /// Create a filled rectangle.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend cannot create or attach the primitive.
    fn create_rect(&mut self, layer: Layer, rect: Rect, style: &FillStyle) -> Result<Self::Handle, SurfaceError>;

    /// Create a text label centered on `anchor`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend cannot create or attach the primitive.
    fn create_text(
        &mut self,
        layer: Layer,
        anchor: Point,
        text: &str,
        style: &TextStyle,
    ) -> Result<Self::Handle, SurfaceError>;

    /// Move, resize, or restyle an existing rectangle.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the handle is stale or the backend rejects the update.
    fn update_rect(&mut self, handle: &Self::Handle, rect: Rect, style: &FillStyle) -> Result<(), SurfaceError>;

    /// Detach and destroy a primitive.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the handle is stale or the backend rejects the removal.
    fn remove(&mut self, handle: Self::Handle) -> Result<(), SurfaceError>;
}

// =============================================================
// In-memory surface
// =============================================================

/// Identifier of a primitive in a [`MemorySurface`].
pub type PrimitiveId = u64;

/// A primitive recorded by [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line { from: Point, to: Point, style: LineStyle },
    Rect { rect: Rect, style: FillStyle },
    Text { anchor: Point, text: String, style: TextStyle },
}

/// Headless surface that records live primitives per layer.
#[derive(Debug, Default)]
pub struct MemorySurface {
    next_id: PrimitiveId,
    items: BTreeMap<PrimitiveId, (Layer, Primitive)>,
    mutations: usize,
    fail_after: Option<usize>,
    fail_updates: bool,
}

impl MemorySurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of successful mutations so far (creates, updates, removes).
    #[must_use]
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    /// Look up a live primitive.
    #[must_use]
    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.items.get(&id).map(|(_, p)| p)
    }

    /// The layer a live primitive is attached to.
    #[must_use]
    pub fn layer_of(&self, id: PrimitiveId) -> Option<Layer> {
        self.items.get(&id).map(|(layer, _)| *layer)
    }

    /// Live primitives on `layer`, bottom first.
    #[must_use]
    pub fn layer(&self, layer: Layer) -> Vec<(PrimitiveId, &Primitive)> {
        self.items
            .iter()
            .filter(|(_, (l, _))| *l == layer)
            .map(|(id, (_, p))| (*id, p))
            .collect()
    }

    /// Let the next `successes` creations through, then fail every one after.
    ///
    /// Removals are never failed, so rollback paths can be observed.
    pub fn fail_creates_after(&mut self, successes: usize) {
        self.fail_after = Some(successes);
    }

    /// Fail every `update_rect` until healed.
    pub fn fail_updates(&mut self) {
        self.fail_updates = true;
    }

    /// Stop injecting failures.
    pub fn heal(&mut self) {
        self.fail_after = None;
        self.fail_updates = false;
    }

    fn admit(&mut self, op: &'static str) -> Result<(), SurfaceError> {
        match self.fail_after {
            Some(0) => Err(SurfaceError::Backend { op, message: "injected failure".to_string() }),
            Some(n) => {
                self.fail_after = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn insert(&mut self, op: &'static str, layer: Layer, primitive: Primitive) -> Result<PrimitiveId, SurfaceError> {
        self.admit(op)?;
        let id = self.next_id;
        self.next_id += 1;
        self.items.insert(id, (layer, primitive));
        self.mutations += 1;
        Ok(id)
    }
}

impl RenderSurface for MemorySurface {
    type Handle = PrimitiveId;

    fn create_line(&mut self, layer: Layer, from: Point, to: Point, style: &LineStyle) -> Result<PrimitiveId, SurfaceError> {
        self.insert("create line", layer, Primitive::Line { from, to, style: *style })
    }

    fn create_rect(&mut self, layer: Layer, rect: Rect, style: &FillStyle) -> Result<PrimitiveId, SurfaceError> {
        self.insert("create rect", layer, Primitive::Rect { rect, style: *style })
    }

    fn create_text(
        &mut self,
        layer: Layer,
        anchor: Point,
        text: &str,
        style: &TextStyle,
    ) -> Result<PrimitiveId, SurfaceError> {
        self.insert("create text", layer, Primitive::Text { anchor, text: text.to_string(), style: *style })
    }

    fn update_rect(&mut self, handle: &PrimitiveId, rect: Rect, style: &FillStyle) -> Result<(), SurfaceError> {
        if !matches!(self.items.get(handle), Some((_, Primitive::Rect { .. }))) {
            return Err(SurfaceError::UnknownHandle);
        }
        if self.fail_updates {
            return Err(SurfaceError::Backend { op: "update rect", message: "injected failure".to_string() });
        }
        if let Some((_, prim)) = self.items.get_mut(handle) {
            *prim = Primitive::Rect { rect, style: *style };
        }
        self.mutations += 1;
        Ok(())
    }

    fn remove(&mut self, handle: PrimitiveId) -> Result<(), SurfaceError> {
        if !self.items.contains_key(&handle) {
            return Err(SurfaceError::UnknownHandle);
        }
        self.items.remove(&handle);
        self.mutations += 1;
        Ok(())
    }
}

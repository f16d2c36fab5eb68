//! Grid geometry: surface points, cell coordinates, and the translation
//! between the two.
//!
//! The grid is immutable once built. Every handler goes through it to turn a
//! continuous pointer position into a discrete cell, and to turn cells back
//! into surface pixels when drawing.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::error::ConfigError;
use crate::input::PointerEvent;

/// A point on the rendering surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// A discrete grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u16,
    pub y: u16,
}

impl Cell {
    #[must_use]
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Pack into a single key: `(y << 16) | x`.
    #[must_use]
    pub fn pack(self) -> u32 {
        (u32::from(self.y) << 16) | u32::from(self.x)
    }

    /// Inverse of [`Cell::pack`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn unpack(key: u32) -> Self {
        Self { x: (key & 0xffff) as u16, y: (key >> 16) as u16 }
    }
}

/// Fixed-size cell grid placed on the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u32,
    height: u32,
    scale: f64,
    origin: Point,
}

impl Grid {
    /// Build a grid from a config.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn new(config: &GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            width: config.width,
            height: config.height,
            scale: config.scale,
            origin: Point::new(config.origin_x, config.origin_y),
        })
    }

    /// Width in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels per cell.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Top-left corner of the grid on the surface.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Whether `cell` lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        u32::from(cell.x) < self.width && u32::from(cell.y) < self.height
    }

    /// Whether a `width` x `height` block anchored at `cell` stays inside the grid.
    #[must_use]
    pub fn fits(&self, cell: Cell, width: u32, height: u32) -> bool {
        u32::from(cell.x) + width <= self.width && u32::from(cell.y) + height <= self.height
    }

    /// The cell at signed cell indices, if inside the grid.
    #[must_use]
    pub fn cell_at(&self, x: i64, y: i64) -> Option<Cell> {
        let (Ok(cx), Ok(cy)) = (u16::try_from(x), u16::try_from(y)) else {
            return None;
        };
        let cell = Cell::new(cx, cy);
        self.contains(cell).then_some(cell)
    }

    /// Convert a surface point to fractional cell units.
    #[must_use]
    pub fn to_cell_space(&self, pt: Point) -> (f64, f64) {
        ((pt.x - self.origin.x) / self.scale, (pt.y - self.origin.y) / self.scale)
    }

    /// The cell containing a surface point, or `None` outside the grid.
    #[must_use]
    pub fn cell_of_point(&self, pt: Point) -> Option<Cell> {
        let (u, v) = self.to_cell_space(pt);
        if !u.is_finite() || !v.is_finite() {
            return None;
        }
        self.cell_at(floor_i64(u), floor_i64(v))
    }

    /// The cell under a pointer event.
    #[must_use]
    pub fn cell_of_point_event(&self, event: &PointerEvent) -> Option<Cell> {
        self.cell_of_point(event.offset)
    }

    /// Top-left corner of `cell` on the surface.
    #[must_use]
    pub fn cell_origin(&self, cell: Cell) -> Point {
        Point::new(
            self.origin.x + f64::from(cell.x) * self.scale,
            self.origin.y + f64::from(cell.y) * self.scale,
        )
    }

    /// Center of `cell` on the surface.
    #[must_use]
    pub fn cell_center(&self, cell: Cell) -> Point {
        let half = self.scale * 0.5;
        self.cell_origin(cell).offset(half, half)
    }

    /// The 4-connected chain of in-grid cells crossed by the straight line
    /// from `from` to `to`, in travel order.
    ///
    /// Consecutive in-grid cells are 4-adjacent. The line is clipped to the
    /// grid first, so the walk is bounded by the grid size however far away
    /// the endpoints are.
    #[must_use]
    pub fn cells_along(&self, from: Point, to: Point) -> Vec<Cell> {
        let a = self.to_cell_space(from);
        let b = self.to_cell_space(to);
        if ![a.0, a.1, b.0, b.1].iter().all(|c| c.is_finite()) {
            return Vec::new();
        }
        let Some(((u0, v0), (u1, v1))) = self.clip(a, b) else {
            return Vec::new();
        };

        let (mut ix, mut iy) = (floor_i64(u0), floor_i64(v0));
        let (ex, ey) = (floor_i64(u1), floor_i64(v1));
        let (step_x, step_y) = ((ex - ix).signum(), (ey - iy).signum());
        let (du, dv) = (u1 - u0, v1 - v0);

        // Parametric distance along the line to the next column / row boundary.
        let mut t_x = first_crossing(u0, du, step_x);
        let mut t_y = first_crossing(v0, dv, step_y);
        let dt_x = if step_x == 0 { f64::INFINITY } else { 1.0 / du.abs() };
        let dt_y = if step_y == 0 { f64::INFINITY } else { 1.0 / dv.abs() };

        let mut rem_x = (ex - ix).abs();
        let mut rem_y = (ey - iy).abs();
        let mut cells = Vec::new();
        cells.extend(self.cell_at(ix, iy));
        while rem_x + rem_y > 0 {
            if rem_y == 0 || (rem_x > 0 && t_x <= t_y) {
                ix += step_x;
                t_x += dt_x;
                rem_x -= 1;
            } else {
                iy += step_y;
                t_y += dt_y;
                rem_y -= 1;
            }
            cells.extend(self.cell_at(ix, iy));
        }
        cells
    }

    /// Liang-Barsky clip of a cell-space segment to `[0, width] x [0, height]`.
    fn clip(&self, (u0, v0): (f64, f64), (u1, v1): (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        let (du, dv) = (u1 - u0, v1 - v0);
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-du, u0), (du, w - u0), (-dv, v0), (dv, h - v0)] {
            if p.abs() < f64::EPSILON {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        Some(((u0 + t0 * du, v0 + t0 * dv), (u0 + t1 * du, v0 + t1 * dv)))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn floor_i64(v: f64) -> i64 {
    v.floor() as i64
}

fn first_crossing(start: f64, delta: f64, step: i64) -> f64 {
    match step {
        1 => (start.floor() + 1.0 - start) / delta,
        -1 => (start - start.floor()) / -delta,
        _ => f64::INFINITY,
    }
}

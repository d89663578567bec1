//! Canvas/screen coordinate mapping and box helpers.
//!
//! Element geometry lives in canvas space. Screen space is what the host
//! reports for pointer events and what floating UI is positioned in:
//!
//! ```text
//! canvas = (screen - pan) / zoom
//! screen = canvas * zoom + pan
//! ```

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom bounds and the multiplicative step applied per zoom in/out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 3.0,
            step: 1.1,
        }
    }
}

/// Pan offset (screen pixels) and zoom scale of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pan: Vec2,
    pub zoom: f64,
    pub limits: ZoomLimits,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

impl Viewport {
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            limits,
        }
    }

    pub fn to_canvas(&self, screen: Point) -> Point {
        ((screen.to_vec2() - self.pan) / self.zoom).to_point()
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        (canvas.to_vec2() * self.zoom + self.pan).to_point()
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.limits.min, self.limits.max);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * self.limits.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / self.limits.step);
    }

    /// Zoom by `factor` keeping the canvas point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        let anchor = self.to_canvas(screen);
        self.set_zoom(self.zoom * factor);
        self.pan = screen.to_vec2() - anchor.to_vec2() * self.zoom;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}

/// The box spanned by a drag from `anchor` to `current`, whichever way the
/// pointer went. Width/height are `|dx|`/`|dy|`; the origin is the
/// component-wise minimum.
pub fn normalize_box(anchor: Point, current: Point) -> Rect {
    Rect::from_points(anchor, current)
}

/// Euclidean diagonal of a box.
pub fn diagonal(rect: Rect) -> f64 {
    rect.width().hypot(rect.height())
}

/// Rotation folded into `[0, 360)` for display. Stored values stay as-is.
pub fn display_rotation(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Final attributes reported at the end of a handle transform: the new
/// top-left and rotation, plus the uncommitted scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformEnd {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

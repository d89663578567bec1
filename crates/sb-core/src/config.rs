//! Editor configuration.
//!
//! Hosts pass a JSON object; every field is optional and falls back to the
//! defaults below. The size floor and font clamp are model invariants and
//! are not configurable.

use crate::color::Color;
use crate::error::{ModelError, Result};
use crate::geometry::ZoomLimits;
use crate::model::{DEFAULT_IMAGE_SRC, PENCIL_TENSION};
use serde::{Deserialize, Serialize};

/// Stroke settings the freehand tools draw with. Persistent across
/// gestures and edited through the draw inspector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingStyle {
    pub stroke: Color,
    pub stroke_width: f64,
    /// Pencil smoothing. Pen strokes always use 0.
    pub tension: f64,
}

impl Default for DrawingStyle {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            stroke_width: 2.0,
            tension: PENCIL_TENSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Drawn boxes with a smaller diagonal are treated as clicks.
    pub min_gesture_diagonal: f64,
    /// Offset applied to both axes of a duplicated element.
    pub duplicate_nudge: f64,
    pub zoom: ZoomLimits,
    /// Maximum undo entries kept; `None` keeps everything.
    pub history_depth: Option<usize>,
    pub default_image_src: String,
    pub drawing: DrawingStyle,
    /// Gap (screen pixels) between an inspector and the element top edge.
    pub inspector_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_gesture_diagonal: 5.0,
            duplicate_nudge: 20.0,
            zoom: ZoomLimits::default(),
            history_depth: None,
            default_image_src: DEFAULT_IMAGE_SRC.to_string(),
            drawing: DrawingStyle::default(),
            inspector_offset: 20.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.zoom.min > 0.0 && self.zoom.min <= self.zoom.max) {
            return Err(ModelError::InvalidConfig(format!(
                "zoom range [{}, {}] is empty or non-positive",
                self.zoom.min, self.zoom.max
            )));
        }
        if self.zoom.step <= 1.0 {
            return Err(ModelError::InvalidConfig(
                "zoom step must be greater than 1".to_string(),
            ));
        }
        if self.min_gesture_diagonal < 0.0 {
            return Err(ModelError::InvalidConfig(
                "minimum gesture diagonal must be >= 0".to_string(),
            ));
        }
        if self.drawing.stroke_width <= 0.0 {
            return Err(ModelError::InvalidConfig(
                "stroke width must be > 0".to_string(),
            ));
        }
        if self.history_depth == Some(0) {
            return Err(ModelError::InvalidConfig(
                "history depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

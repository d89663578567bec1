pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod id;
pub mod kind;
pub mod model;
pub mod record;
pub mod scene;

pub use color::Color;
pub use config::{DrawingStyle, EditorConfig};
pub use error::{ModelError, Result};
pub use geometry::{TransformEnd, Viewport, ZoomLimits};
pub use id::ElementId;
pub use kind::{ElementKind, PayloadClass};
pub use model::*;
pub use record::ElementRecord;
pub use scene::Scene;

// Re-export kurbo so downstream crates share one geometry vocabulary
pub use kurbo;

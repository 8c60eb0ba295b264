use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::config::LayoutConfig;
use scenery_api_core::{Size, Vec2};

/// A child as seen by the layout pass.
///
/// `position` is written by the pass; every other field is input, except that
/// child-resize modes also rewrite `size`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub visible: bool,
    pub size: Size,
    pub anchor: Vec2,
    pub scale: Vec2,
    /// Position as authored, relative to the container anchor.
    pub authoring_position: Vec2,
    /// Position relative to the container's bottom-left corner.
    pub position: Vec2,
}

impl Default for LayoutItem {
    fn default() -> Self {
        Self {
            visible: true,
            size: Size::ZERO,
            anchor: Vec2::new(0.5, 0.5),
            scale: Vec2::new(1.0, 1.0),
            authoring_position: Vec2::ZERO,
            position: Vec2::ZERO,
        }
    }
}

impl LayoutItem {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    /// Scaled extent along `axis`.
    #[inline]
    pub fn extent(&self, cfg: &LayoutConfig, axis: Axis) -> f32 {
        axis.extent(self.size) * cfg.used_scale(axis.of(self.scale))
    }
}

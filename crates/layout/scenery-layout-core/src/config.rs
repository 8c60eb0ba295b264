//! Container layout configuration.

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use scenery_api_core::Size;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutKind {
    #[default]
    None,
    Horizontal,
    Vertical,
    Grid,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeMode {
    #[default]
    None,
    /// The container grows or shrinks to fit its children.
    Container,
    /// Children are resized to fill the container.
    Children,
}

/// Primary fill axis of a grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalDirection {
    #[default]
    TopToBottom,
    BottomToTop,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn uniform(v: f32) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub kind: LayoutKind,
    pub resize: ResizeMode,
    pub start_axis: AxisDirection,
    pub horizontal_direction: HorizontalDirection,
    pub vertical_direction: VerticalDirection,
    pub padding: Padding,
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub cell_size: Size,
    pub affected_by_scale: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            kind: LayoutKind::None,
            resize: ResizeMode::None,
            start_axis: AxisDirection::Horizontal,
            horizontal_direction: HorizontalDirection::LeftToRight,
            vertical_direction: VerticalDirection::TopToBottom,
            padding: Padding::default(),
            spacing_x: 0.0,
            spacing_y: 0.0,
            cell_size: Size::new(40.0, 40.0),
            affected_by_scale: false,
        }
    }
}

impl LayoutConfig {
    pub fn horizontal() -> Self {
        Self {
            kind: LayoutKind::Horizontal,
            ..Self::default()
        }
    }

    pub fn vertical() -> Self {
        Self {
            kind: LayoutKind::Vertical,
            ..Self::default()
        }
    }

    pub fn grid(cell_size: Size) -> Self {
        Self {
            kind: LayoutKind::Grid,
            cell_size,
            ..Self::default()
        }
    }

    /// Scale factor used when measuring a child; zero counts as unscaled.
    #[inline]
    pub fn used_scale(&self, value: f32) -> f32 {
        if !self.affected_by_scale || value == 0.0 {
            1.0
        } else {
            value.abs()
        }
    }

    #[inline]
    pub fn spacing(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.spacing_x,
            Axis::Y => self.spacing_y,
        }
    }

    /// Whether flow along `axis` runs toward negative coordinates.
    #[inline]
    pub fn reversed(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.horizontal_direction == HorizontalDirection::RightToLeft,
            Axis::Y => self.vertical_direction == VerticalDirection::TopToBottom,
        }
    }

    /// Padding at the edge where flow along `axis` starts.
    pub fn leading_padding(&self, axis: Axis) -> f32 {
        match (axis, self.reversed(axis)) {
            (Axis::X, false) => self.padding.left,
            (Axis::X, true) => self.padding.right,
            (Axis::Y, false) => self.padding.bottom,
            (Axis::Y, true) => self.padding.top,
        }
    }

    /// Padding at the edge where flow along `axis` ends.
    pub fn trailing_padding(&self, axis: Axis) -> f32 {
        match (axis, self.reversed(axis)) {
            (Axis::X, false) => self.padding.right,
            (Axis::X, true) => self.padding.left,
            (Axis::Y, false) => self.padding.top,
            (Axis::Y, true) => self.padding.bottom,
        }
    }

    #[inline]
    pub fn padding_sum(&self, axis: Axis) -> f32 {
        self.leading_padding(axis) + self.trailing_padding(axis)
    }
}

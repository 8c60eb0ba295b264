//! Responsive edge alignment of a node against its parent's rectangle.
//!
//! Each axis is resolved on its own. Two opposing active edges stretch the node; a
//! single edge or the center flag only moves it. Offsets are pixels when the matching
//! absolute flag is set, otherwise fractions of the parent extent.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

use scenery_api_core::{Size, Vec2};

/// Active edges, using the authoring tool's bit values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignFlags(pub u8);

impl AlignFlags {
    pub const NONE: AlignFlags = AlignFlags(0);
    pub const TOP: AlignFlags = AlignFlags(1);
    /// Vertical center.
    pub const MIDDLE: AlignFlags = AlignFlags(2);
    pub const BOTTOM: AlignFlags = AlignFlags(4);
    pub const LEFT: AlignFlags = AlignFlags(8);
    /// Horizontal center.
    pub const CENTER: AlignFlags = AlignFlags(16);
    pub const RIGHT: AlignFlags = AlignFlags(32);

    const HORIZONTAL: u8 = 8 | 16 | 32;
    const VERTICAL: u8 = 1 | 2 | 4;

    #[inline]
    pub fn contains(self, other: AlignFlags) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[inline]
    pub fn any_horizontal(self) -> bool {
        self.0 & Self::HORIZONTAL != 0
    }

    #[inline]
    pub fn any_vertical(self) -> bool {
        self.0 & Self::VERTICAL != 0
    }
}

impl BitOr for AlignFlags {
    type Output = AlignFlags;
    fn bitor(self, rhs: AlignFlags) -> AlignFlags {
        AlignFlags(self.0 | rhs.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetAnchor {
    pub flags: AlignFlags,
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub horizontal_center: f32,
    pub vertical_center: f32,
    pub absolute_top: bool,
    pub absolute_bottom: bool,
    pub absolute_left: bool,
    pub absolute_right: bool,
    pub absolute_horizontal_center: bool,
    pub absolute_vertical_center: bool,
    /// Align once at setup instead of every tick.
    pub align_once: bool,
}

impl WidgetAnchor {
    pub fn stretches_width(&self) -> bool {
        self.flags.contains(AlignFlags::LEFT) && self.flags.contains(AlignFlags::RIGHT)
    }

    pub fn stretches_height(&self) -> bool {
        self.flags.contains(AlignFlags::TOP) && self.flags.contains(AlignFlags::BOTTOM)
    }
}

/// The node being aligned.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnchorBox {
    /// Authoring position, relative to the parent anchor.
    pub position: Vec2,
    pub size: Size,
    pub anchor: Vec2,
    pub scale: Vec2,
}

/// The rectangle a node aligns against, in the node's parent-anchor space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParentFrame {
    pub left: f32,
    pub bottom: f32,
    pub size: Size,
}

impl ParentFrame {
    /// Frame of a regular parent with the given anchor and content size.
    pub fn of_parent(anchor: Vec2, size: Size) -> Self {
        Self {
            left: -anchor.x * size.width,
            bottom: -anchor.y * size.height,
            size,
        }
    }

    /// Frame of the visible viewport, used for nodes directly under the root.
    pub fn viewport(origin: Vec2, size: Size) -> Self {
        Self {
            left: origin.x,
            bottom: origin.y,
            size,
        }
    }
}

#[inline]
fn offset(value: f32, absolute: bool, extent: f32) -> f32 {
    if absolute {
        value
    } else {
        value * extent
    }
}

/// Resolved placement along one axis.
struct AxisEdges {
    near_active: bool,
    far_active: bool,
    center_active: bool,
    near: f32,
    far: f32,
    center: f32,
}

/// Returns (position, new content extent if stretched).
fn align_axis(edges: AxisEdges, start: f32, extent: f32, anchor: f32, scale: f32, content: f32) -> (f32, Option<f32>) {
    let (anchor, scale) = if scale < 0.0 {
        (1.0 - anchor, -scale)
    } else {
        (anchor, scale)
    };
    let lo = start + edges.near;
    let hi = start + extent - edges.far;

    if edges.near_active && edges.far_active {
        let span = hi - lo;
        let stretched = if scale != 0.0 { Some(span / scale) } else { None };
        return (lo + anchor * span, stretched);
    }

    let span = content * scale;
    let pos = if edges.center_active {
        let mid = start + 0.5 * extent;
        mid + (anchor - 0.5) * span + edges.center
    } else if edges.near_active {
        lo + anchor * span
    } else {
        hi + (anchor - 1.0) * span
    };
    (pos, None)
}

/// Align `node` against `parent`. Writes the new position, and the new content size
/// on stretched axes.
pub fn align(widget: &WidgetAnchor, node: &mut AnchorBox, parent: ParentFrame) {
    let flags = widget.flags;
    let (w, h) = (parent.size.width, parent.size.height);

    if flags.any_horizontal() {
        let edges = AxisEdges {
            near_active: flags.contains(AlignFlags::LEFT),
            far_active: flags.contains(AlignFlags::RIGHT),
            center_active: flags.contains(AlignFlags::CENTER),
            near: offset(widget.left, widget.absolute_left, w),
            far: offset(widget.right, widget.absolute_right, w),
            center: offset(widget.horizontal_center, widget.absolute_horizontal_center, w),
        };
        let (x, stretched) = align_axis(
            edges,
            parent.left,
            w,
            node.anchor.x,
            node.scale.x,
            node.size.width,
        );
        node.position.x = x;
        if let Some(width) = stretched {
            node.size.width = width;
        }
    }

    if flags.any_vertical() {
        let edges = AxisEdges {
            near_active: flags.contains(AlignFlags::BOTTOM),
            far_active: flags.contains(AlignFlags::TOP),
            center_active: flags.contains(AlignFlags::MIDDLE),
            near: offset(widget.bottom, widget.absolute_bottom, h),
            far: offset(widget.top, widget.absolute_top, h),
            center: offset(widget.vertical_center, widget.absolute_vertical_center, h),
        };
        let (y, stretched) = align_axis(
            edges,
            parent.bottom,
            h,
            node.anchor.y,
            node.scale.y,
            node.size.height,
        );
        node.position.y = y;
        if let Some(height) = stretched {
            node.size.height = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(w: f32, h: f32) -> AnchorBox {
        AnchorBox {
            position: Vec2::ZERO,
            size: Size::new(w, h),
            anchor: Vec2::new(0.5, 0.5),
            scale: Vec2::new(1.0, 1.0),
        }
    }

    #[test]
    fn relative_stretch_shrinks_by_both_margins() {
        let widget = WidgetAnchor {
            flags: AlignFlags::LEFT | AlignFlags::RIGHT,
            left: 0.1,
            right: 0.1,
            ..Default::default()
        };
        let mut n = node(10.0, 10.0);
        align(&widget, &mut n, ParentFrame::of_parent(Vec2::new(0.5, 0.5), Size::new(200.0, 100.0)));
        assert!((n.size.width - 160.0).abs() < 1e-4);
        assert!(n.position.x.abs() < 1e-4);
        assert_eq!(n.size.height, 10.0);
    }

    #[test]
    fn stretch_divides_by_scale() {
        let widget = WidgetAnchor {
            flags: AlignFlags::TOP | AlignFlags::BOTTOM,
            absolute_top: true,
            absolute_bottom: true,
            ..Default::default()
        };
        let mut n = node(10.0, 10.0);
        n.scale.y = 2.0;
        align(&widget, &mut n, ParentFrame::of_parent(Vec2::ZERO, Size::new(50.0, 100.0)));
        assert_eq!(n.size.height, 50.0);
        assert_eq!(n.position.y, 50.0);
    }

    #[test]
    fn absolute_left_and_right_edges() {
        let mut widget = WidgetAnchor {
            flags: AlignFlags::LEFT,
            left: 10.0,
            absolute_left: true,
            ..Default::default()
        };
        let parent = ParentFrame::of_parent(Vec2::new(0.5, 0.5), Size::new(200.0, 100.0));
        let mut n = node(20.0, 20.0);
        align(&widget, &mut n, parent);
        assert_eq!(n.position.x, -100.0 + 10.0 + 10.0);

        widget.flags = AlignFlags::RIGHT;
        widget.right = 10.0;
        widget.absolute_right = true;
        align(&widget, &mut n, parent);
        assert_eq!(n.position.x, 100.0 - 10.0 - 10.0);
    }

    #[test]
    fn mirrored_node_swaps_anchor() {
        let widget = WidgetAnchor {
            flags: AlignFlags::LEFT,
            absolute_left: true,
            ..Default::default()
        };
        let mut n = node(20.0, 20.0);
        n.anchor.x = 0.0;
        n.scale.x = -1.0;
        align(&widget, &mut n, ParentFrame::of_parent(Vec2::ZERO, Size::new(100.0, 100.0)));
        // Mirrored around its left anchor, the node extends leftward; push it right.
        assert_eq!(n.position.x, 20.0);
    }

    #[test]
    fn center_offsets_are_independent_per_axis() {
        let widget = WidgetAnchor {
            flags: AlignFlags::CENTER | AlignFlags::MIDDLE,
            horizontal_center: 5.0,
            vertical_center: 0.1,
            absolute_horizontal_center: true,
            absolute_vertical_center: false,
            ..Default::default()
        };
        let mut n = node(10.0, 10.0);
        align(&widget, &mut n, ParentFrame::of_parent(Vec2::new(0.5, 0.5), Size::new(200.0, 100.0)));
        assert_eq!(n.position.x, 5.0);
        assert!((n.position.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn viewport_frame_uses_visible_origin() {
        let widget = WidgetAnchor {
            flags: AlignFlags::BOTTOM | AlignFlags::LEFT,
            absolute_bottom: true,
            absolute_left: true,
            ..Default::default()
        };
        let mut n = node(10.0, 10.0);
        align(&widget, &mut n, ParentFrame::viewport(Vec2::new(4.0, 8.0), Size::new(320.0, 480.0)));
        assert_eq!(n.position, Vec2::new(9.0, 13.0));
    }

    #[test]
    fn untouched_axis_keeps_position() {
        let widget = WidgetAnchor {
            flags: AlignFlags::TOP,
            absolute_top: true,
            ..Default::default()
        };
        let mut n = node(10.0, 10.0);
        n.position.x = 42.0;
        align(&widget, &mut n, ParentFrame::of_parent(Vec2::ZERO, Size::new(100.0, 100.0)));
        assert_eq!(n.position.x, 42.0);
        assert_eq!(n.position.y, 95.0);
    }
}

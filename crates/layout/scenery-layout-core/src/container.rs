//! Container recompute: linear and grid layouts plus the dirty-flag wrapper.

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::config::{AxisDirection, LayoutConfig, LayoutKind, ResizeMode};
use crate::flow::{run_flow, Edge, FlowOutcome};
use crate::item::LayoutItem;
use scenery_api_core::{Size, Vec2};

/// Geometry of the container being laid out.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerBox {
    pub anchor: Vec2,
    pub size: Size,
}

impl ContainerBox {
    pub fn new(anchor: Vec2, size: Size) -> Self {
        Self { anchor, size }
    }
}

/// A layout configuration plus its dirty flag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub config: LayoutConfig,
    #[serde(skip)]
    dirty: bool,
}

impl LayoutNode {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            dirty: false,
        }
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute when dirty and non-empty. Returns true when a pass ran.
    pub fn update(&mut self, container: &mut ContainerBox, items: &mut [LayoutItem]) -> bool {
        if !self.dirty || items.is_empty() {
            return false;
        }
        recompute(&self.config, container, items);
        self.dirty = false;
        true
    }
}

/// Lay out `items` inside `container`.
///
/// Item positions come out relative to the container's bottom-left corner. Returns
/// false when nothing was placed (no visible children, unsupported kind, or a
/// non-positive extent); positions are left untouched in that case.
pub fn recompute(cfg: &LayoutConfig, container: &mut ContainerBox, items: &mut [LayoutItem]) -> bool {
    let active = items.iter().filter(|i| i.visible).count();
    if active == 0 {
        return false;
    }
    let placed = match cfg.kind {
        LayoutKind::None => false,
        LayoutKind::Horizontal => linear(cfg, Axis::X, container, items, active),
        LayoutKind::Vertical => linear(cfg, Axis::Y, container, items, active),
        LayoutKind::Grid => match cfg.start_axis {
            AxisDirection::Horizontal => grid(cfg, Axis::X, container, items),
            AxisDirection::Vertical => grid(cfg, Axis::Y, container, items),
        },
    };
    if placed {
        adjust_position(container, items);
        log::debug!(
            "layout {:?}: {} children in {}x{}",
            cfg.kind,
            active,
            container.size.width,
            container.size.height
        );
    }
    placed
}

/// Shift placed children from anchor-relative to corner-relative coordinates.
fn adjust_position(container: &ContainerBox, items: &mut [LayoutItem]) {
    let offset = Vec2::anchor_offset(container.anchor, container.size);
    for item in items.iter_mut().filter(|i| i.visible) {
        item.position += offset;
    }
}

/// Main extent before placement: fitted to the children for container resize,
/// otherwise the current extent.
fn base_extent(cfg: &LayoutConfig, axis: Axis, container: &ContainerBox, items: &[LayoutItem], active: usize) -> f32 {
    if cfg.resize != ResizeMode::Container {
        return axis.extent(container.size);
    }
    let sum: f32 = items
        .iter()
        .filter(|i| i.visible)
        .map(|i| i.extent(cfg, axis))
        .sum();
    sum + (active as f32 - 1.0) * cfg.spacing(axis) + cfg.padding_sum(axis)
}

fn linear(
    cfg: &LayoutConfig,
    axis: Axis,
    container: &mut ContainerBox,
    items: &mut [LayoutItem],
    active: usize,
) -> bool {
    let base = base_extent(cfg, axis, container, items, active);
    if !(base > 0.0) {
        return false;
    }

    if cfg.resize == ResizeMode::Children {
        let share = (base - cfg.padding_sum(axis) - (active as f32 - 1.0) * cfg.spacing(axis))
            / active as f32;
        if !(share > 0.0) {
            return false;
        }
        for item in items.iter_mut().filter(|i| i.visible) {
            let scale = cfg.used_scale(axis.of(item.scale));
            axis.set_extent(&mut item.size, share / scale);
        }
    }

    let outcome = run_flow(cfg, axis, container.anchor, base, items, false);
    let cross = axis.cross();
    for p in &outcome.placements {
        let item = &mut items[p.index];
        axis.set(&mut item.position, p.main);
        cross.set(&mut item.position, cross.of(item.authoring_position));
    }
    axis.set_extent(&mut container.size, base);
    true
}

fn grid(cfg: &LayoutConfig, axis: Axis, container: &mut ContainerBox, items: &mut [LayoutItem]) -> bool {
    let base = axis.extent(container.size);
    if !(base > 0.0) {
        return false;
    }
    let cross = axis.cross();

    if cfg.resize == ResizeMode::Children {
        for item in items.iter_mut().filter(|i| i.visible) {
            let main_scale = cfg.used_scale(axis.of(item.scale));
            let cross_scale = cfg.used_scale(cross.of(item.scale));
            axis.set_extent(&mut item.size, axis.extent(cfg.cell_size) / main_scale);
            cross.set_extent(&mut item.size, cross.extent(cfg.cell_size) / cross_scale);
        }
    }

    // Container resize: measure first, fix the cross extent, then flow again
    // against the corrected boundary.
    let outcome: FlowOutcome = if cfg.resize == ResizeMode::Container {
        let measured = run_flow(cfg, axis, container.anchor, base, items, true);
        cross.set_extent(&mut container.size, measured.cross_extent(cfg, axis));
        run_flow(cfg, axis, container.anchor, base, items, true)
    } else {
        run_flow(cfg, axis, container.anchor, base, items, true)
    };

    let cross_edge = Edge::new(cfg, cross, container.anchor, cross.extent(container.size));
    let cross_pad = cfg.leading_padding(cross);
    let cross_spacing = cfg.spacing(cross);
    for p in &outcome.placements {
        let item = &mut items[p.index];
        let extent = item.extent(cfg, cross);
        let anchor = cross_edge.leading_anchor(cross.of(item.anchor));
        let c = cross_edge.start
            + cross_edge.sign
                * (p.line_offset + anchor * extent + cross_pad + p.line as f32 * cross_spacing);
        axis.set(&mut item.position, p.main);
        cross.set(&mut item.position, c);
    }
    true
}

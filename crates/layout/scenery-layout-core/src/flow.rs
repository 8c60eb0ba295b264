//! Single-axis flow with optional line breaking.
//!
//! Children are walked in order along the main axis from the leading edge. Each child's
//! anchor point lands on the cursor; the cursor then moves past the child's trailing
//! extent plus spacing. Positions are relative to the container anchor.

use crate::axis::Axis;
use crate::config::LayoutConfig;
use crate::item::LayoutItem;
use scenery_api_core::Vec2;

/// Where one visible item landed on the main axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub main: f32,
    pub line: usize,
    /// Sum of cross extents of every earlier line.
    pub line_offset: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowOutcome {
    pub placements: Vec<Placement>,
    /// Largest cross extent per line.
    pub line_extents: Vec<f32>,
}

impl FlowOutcome {
    pub fn lines(&self) -> usize {
        self.line_extents.len()
    }

    /// Cross size needed to hold every line plus spacing and padding.
    pub fn cross_extent(&self, cfg: &LayoutConfig, axis: Axis) -> f32 {
        let cross = axis.cross();
        let lines = self.line_extents.len() as f32;
        let gaps = (lines - 1.0).max(0.0) * cfg.spacing(cross);
        cfg.padding_sum(cross) + self.line_extents.iter().sum::<f32>() + gaps
    }
}

/// Leading-edge geometry of one axis inside a container.
#[derive(Copy, Clone, Debug)]
pub struct Edge {
    pub sign: f32,
    /// Leading boundary, relative to the container anchor.
    pub start: f32,
    /// Opposite boundary.
    pub end: f32,
}

impl Edge {
    pub fn new(cfg: &LayoutConfig, axis: Axis, container_anchor: Vec2, extent: f32) -> Self {
        let a = axis.of(container_anchor);
        if cfg.reversed(axis) {
            Edge {
                sign: -1.0,
                start: (1.0 - a) * extent,
                end: -a * extent,
            }
        } else {
            Edge {
                sign: 1.0,
                start: -a * extent,
                end: (1.0 - a) * extent,
            }
        }
    }

    /// Child anchor fraction measured from the leading side.
    #[inline]
    pub fn leading_anchor(&self, anchor: f32) -> f32 {
        if self.sign < 0.0 {
            1.0 - anchor
        } else {
            anchor
        }
    }
}

/// Walk visible items along `axis` inside a container of main extent `base`.
pub fn run_flow(
    cfg: &LayoutConfig,
    axis: Axis,
    container_anchor: Vec2,
    base: f32,
    items: &[LayoutItem],
    wrap: bool,
) -> FlowOutcome {
    let edge = Edge::new(cfg, axis, container_anchor, base);
    let sign = edge.sign;
    let spacing = cfg.spacing(axis);
    let lead_pad = cfg.leading_padding(axis);
    let trail_pad = cfg.trailing_padding(axis);
    let cross = axis.cross();

    let mut out = FlowOutcome::default();
    let mut next = edge.start + sign * lead_pad - sign * spacing;
    let mut line = 0usize;
    let mut line_offset = 0.0f32;
    let mut line_max = 0.0f32;
    let mut in_line = 0usize;

    for (index, item) in items.iter().enumerate() {
        if !item.visible {
            continue;
        }
        let extent = item.extent(cfg, axis);
        let cross_extent = item.extent(cfg, cross);
        let anchor = edge.leading_anchor(axis.of(item.anchor));

        next += sign * anchor * extent + sign * spacing;
        let trailing = sign * (1.0 - anchor) * extent;

        if wrap && in_line > 0 {
            let far = next + trailing + sign * trail_pad;
            if sign * (far - edge.end) > 0.0 {
                out.line_extents.push(line_max);
                line_offset += line_max;
                line_max = 0.0;
                line += 1;
                in_line = 0;
                next = edge.start + sign * (lead_pad + anchor * extent);
            }
        }

        out.placements.push(Placement {
            index,
            main: next,
            line,
            line_offset,
        });
        line_max = line_max.max(cross_extent);
        in_line += 1;
        next += trailing;
    }
    if in_line > 0 {
        out.line_extents.push(line_max);
    }
    out
}

//! Visible-range query for recycled scroll lists.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::container::ContainerBox;
use crate::item::LayoutItem;
use scenery_api_core::Rect;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollDirection {
    Horizontal,
    #[default]
    Vertical,
    Both,
}

/// First and last child index whose vertical extent overlaps `bounds`.
///
/// Child edges are measured downward from the container's anchor line, the same frame
/// a scroll view reports its container bounds in; `bounds.origin.y` is the top of the
/// window and `bounds.max_y()` the bottom. Only vertical scrolling is supported: any
/// other direction logs a warning and reports every child.
pub fn visible_range(
    cfg: &LayoutConfig,
    container: &ContainerBox,
    items: &[LayoutItem],
    bounds: Rect,
    direction: ScrollDirection,
) -> Option<(usize, usize)> {
    if items.is_empty() {
        return None;
    }
    if direction != ScrollDirection::Vertical {
        log::warn!("visible range supports vertical scrolling only, got {direction:?}");
        return Some((0, items.len() - 1));
    }

    let anchor_line = container.anchor.y * container.size.height;
    let mut first = None;
    let mut last = None;
    for (i, item) in items.iter().enumerate() {
        let h = item.size.height * cfg.used_scale(item.scale.y);
        let top = anchor_line - (item.position.y + (1.0 - item.anchor.y) * h);
        let bottom = anchor_line - (item.position.y - item.anchor.y * h);
        if top <= bounds.max_y() && bottom >= bounds.min_y() {
            first.get_or_insert(i);
            last = Some(i);
        }
    }
    Some((first?, last?))
}

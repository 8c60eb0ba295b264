//! Runs the layout algorithms against layout containers in a [`SceneTree`].

use crate::node::{Node, NodeKind};
use crate::tree::SceneTree;
use hashbrown::HashSet;
use scenery_api_core::NodeId;
use scenery_layout_core::{visible_range, ContainerBox, LayoutItem};

fn item_of(node: &Node) -> LayoutItem {
    LayoutItem {
        visible: node.common.visible,
        size: node.common.size,
        anchor: node.common.anchor,
        scale: node.common.scale,
        authoring_position: node.common.authoring_position,
        position: node.common.position,
    }
}

fn gather(tree: &SceneTree, container: NodeId) -> (Vec<NodeId>, Vec<LayoutItem>) {
    let ids = tree.children(container).to_vec();
    let items = ids
        .iter()
        .filter_map(|id| tree.get(*id).map(item_of))
        .collect();
    (ids, items)
}

/// Recompute one container if it is dirty. Returns true when a pass ran.
pub fn update_layout(tree: &mut SceneTree, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    if !node.as_layout().is_some_and(|l| l.layout.is_dirty()) {
        return false;
    }
    let mut container = ContainerBox::new(node.common.anchor, node.common.size);
    let (ids, mut items) = gather(tree, id);
    if ids.len() != items.len() {
        log::warn!("layout {id}: child list holds stale handles");
        return false;
    }

    let Some(layout) = tree.get_mut(id).and_then(Node::as_layout_mut) else {
        return false;
    };
    if !layout.layout.update(&mut container, &mut items) {
        return false;
    }
    log::debug!("layout {id}: recomputed {} children", items.len());

    let parent = tree.parent(id);
    if let Some(node) = tree.get_mut(id) {
        if node.common.size != container.size {
            node.common.size = container.size;
            if let Some(p) = parent {
                tree.mark_layout_dirty(p);
            }
        }
    }

    let offset = scenery_api_core::Vec2::anchor_offset(container.anchor, container.size);
    for (child, item) in ids.into_iter().zip(items) {
        let Some(node) = tree.get_mut(child) else {
            continue;
        };
        let resized = node.common.size != item.size;
        node.common.size = item.size;
        if item.visible {
            node.common.position = item.position;
            node.common.authoring_position = item.position - offset;
        }
        if resized {
            tree.mark_layout_dirty(child);
        }
    }
    true
}

/// Upper bound on settle rounds within one [`update_dirty_layouts`] call.
const MAX_SETTLE_ROUNDS: usize = 16;

fn dirty_containers(tree: &SceneTree, idle: &HashSet<NodeId>) -> Vec<NodeId> {
    let mut dirty: Vec<(usize, NodeId)> = tree
        .ids()
        .filter(|id| !idle.contains(id))
        .filter(|id| {
            tree.get(*id)
                .and_then(Node::as_layout)
                .is_some_and(|l| l.layout.is_dirty())
        })
        .map(|id| (tree.depth(id), id))
        .collect();
    dirty.sort_by(|a, b| b.0.cmp(&a.0));
    dirty.into_iter().map(|(_, id)| id).collect()
}

/// Recompute every dirty container, deepest first, until none is left.
///
/// A pass that resizes its container dirties the parent layout, and a
/// children-resize pass dirties resized child layouts; both settle in the same
/// call. Containers whose pass places nothing stay dirty for the next call.
/// Returns how many passes ran.
pub fn update_dirty_layouts(tree: &mut SceneTree) -> usize {
    let mut idle = HashSet::new();
    let mut passes = 0;
    for _ in 0..MAX_SETTLE_ROUNDS {
        let dirty = dirty_containers(tree, &idle);
        if dirty.is_empty() {
            return passes;
        }
        let mut ran = 0;
        for id in dirty {
            if update_layout(tree, id) {
                ran += 1;
            } else {
                idle.insert(id);
            }
        }
        if ran == 0 {
            return passes;
        }
        passes += ran;
    }
    if !dirty_containers(tree, &idle).is_empty() {
        log::warn!("layouts still dirty after {MAX_SETTLE_ROUNDS} settle rounds");
    }
    passes
}

/// Show `child` and relayout its container immediately.
pub fn show_child(tree: &mut SceneTree, container: NodeId, child: NodeId) {
    set_child_visible(tree, container, child, true);
}

/// Hide `child` and relayout its container immediately.
pub fn hide_child(tree: &mut SceneTree, container: NodeId, child: NodeId) {
    set_child_visible(tree, container, child, false);
}

fn set_child_visible(tree: &mut SceneTree, container: NodeId, child: NodeId, visible: bool) {
    if tree.parent(child) != Some(container) {
        log::warn!("{child} is not a child of layout {container}");
        return;
    }
    tree.set_visible(child, visible);
    tree.mark_layout_dirty(container);
    update_layout(tree, container);
}

/// First and last child of a recycled list that overlap its scroll view's window.
pub fn visible_children_range(tree: &SceneTree, layout: NodeId) -> Option<(usize, usize)> {
    let node = tree.get(layout)?;
    let config = &node.as_layout()?.layout.config;
    let view_id = node.as_layout()?.scroll_view?;
    let view = tree.get(view_id)?;
    let NodeKind::ScrollView(scroll) = &view.kind else {
        return None;
    };
    let bounds = scroll.container_bounds(view.common.size);
    let container = ContainerBox::new(node.common.anchor, node.common.size);
    let (_, items) = gather(tree, layout);
    visible_range(config, &container, &items, bounds, scroll.direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{LayoutBox, NodeCommon};
    use scenery_api_core::{Size, Vec2};
    use scenery_layout_core::{LayoutConfig, LayoutNode, ResizeMode};

    fn container(cfg: LayoutConfig, size: Size) -> Node {
        Node::new(
            NodeCommon {
                size,
                ..NodeCommon::default()
            },
            NodeKind::Layout(LayoutBox {
                layout: LayoutNode::new(cfg),
                scroll_view: None,
            }),
        )
    }

    fn child(w: f32, h: f32) -> Node {
        Node::new(
            NodeCommon {
                size: Size::new(w, h),
                ..NodeCommon::default()
            },
            NodeKind::Plain,
        )
    }

    fn row(tree: &mut SceneTree, n: usize) -> (NodeId, Vec<NodeId>) {
        let mut cfg = LayoutConfig::horizontal();
        cfg.resize = ResizeMode::Container;
        cfg.spacing_x = 10.0;
        let row = tree.insert(container(cfg, Size::new(0.0, 40.0)));
        let kids = (0..n)
            .map(|_| {
                let c = tree.insert(child(20.0, 20.0));
                tree.attach(row, c);
                c
            })
            .collect();
        (row, kids)
    }

    #[test]
    fn dirty_container_is_laid_out_once() {
        let mut tree = SceneTree::new();
        let (row, kids) = row(&mut tree, 3);
        assert_eq!(update_dirty_layouts(&mut tree), 1);
        assert_eq!(update_dirty_layouts(&mut tree), 0);

        let node = tree.get(row).unwrap();
        assert!((node.common.size.width - 80.0).abs() < 1e-4);
        let xs: Vec<f32> = kids
            .iter()
            .map(|k| tree.get(*k).unwrap().common.position.x)
            .collect();
        assert_eq!(xs, vec![10.0, 40.0, 70.0]);
        // Authoring positions stay relative to the container anchor.
        let first = tree.get(kids[0]).unwrap();
        assert_eq!(first.common.authoring_position.x, -30.0);
    }

    #[test]
    fn hiding_a_child_relayouts_immediately() {
        let mut tree = SceneTree::new();
        let (row, kids) = row(&mut tree, 3);
        update_dirty_layouts(&mut tree);
        hide_child(&mut tree, row, kids[1]);
        let node = tree.get(row).unwrap();
        assert!((node.common.size.width - 50.0).abs() < 1e-4);
        assert_eq!(tree.get(kids[2]).unwrap().common.position.x, 40.0);
        // The hidden child keeps its last position.
        assert_eq!(tree.get(kids[1]).unwrap().common.position.x, 40.0);

        show_child(&mut tree, row, kids[1]);
        assert!((tree.get(row).unwrap().common.size.width - 80.0).abs() < 1e-4);
    }

    #[test]
    fn nested_layouts_run_inner_first() {
        let mut tree = SceneTree::new();
        let mut outer_cfg = LayoutConfig::vertical();
        outer_cfg.resize = ResizeMode::Container;
        let outer = tree.insert(container(outer_cfg, Size::new(100.0, 0.0)));
        let (inner, _) = row(&mut tree, 2);
        tree.attach(outer, inner);

        assert_eq!(update_dirty_layouts(&mut tree), 2);
        let outer = tree.get(outer).unwrap();
        assert!((outer.common.size.height - 40.0).abs() < 1e-4);
        let inner = tree.get(inner).unwrap();
        assert!((inner.common.size.width - 50.0).abs() < 1e-4);
        assert_eq!(inner.common.position, Vec2::new(50.0, 20.0));
    }

    #[test]
    fn clean_outer_row_grows_in_the_same_call() {
        let mut tree = SceneTree::new();
        let mut outer_cfg = LayoutConfig::horizontal();
        outer_cfg.resize = ResizeMode::Container;
        let outer = tree.insert(container(outer_cfg, Size::new(0.0, 40.0)));
        let (inner, kids) = row(&mut tree, 1);
        tree.attach(outer, inner);
        assert_eq!(update_dirty_layouts(&mut tree), 2);
        assert!((tree.get(outer).unwrap().common.size.width - 20.0).abs() < 1e-4);

        tree.get_mut(kids[0]).unwrap().common.size.width = 70.0;
        assert!(tree.mark_layout_dirty(inner));
        assert_eq!(update_dirty_layouts(&mut tree), 2);
        let outer = tree.get(outer).unwrap();
        assert!(!outer.as_layout().unwrap().layout.is_dirty());
        assert!((outer.common.size.width - 70.0).abs() < 1e-4);
    }

    #[test]
    fn children_resize_settles_child_layouts() {
        let mut tree = SceneTree::new();
        let mut outer_cfg = LayoutConfig::horizontal();
        outer_cfg.resize = ResizeMode::Children;
        let outer = tree.insert(container(outer_cfg, Size::new(100.0, 40.0)));
        let mut inner_cfg = LayoutConfig::horizontal();
        inner_cfg.resize = ResizeMode::Children;
        let inner = tree.insert(container(inner_cfg, Size::new(10.0, 40.0)));
        let leaves: Vec<NodeId> = (0..2)
            .map(|_| {
                let c = tree.insert(child(5.0, 20.0));
                tree.attach(inner, c);
                c
            })
            .collect();
        tree.attach(outer, inner);
        update_dirty_layouts(&mut tree);
        // Outer stretches inner to 100, and inner then splits that between its leaves.
        assert!((tree.get(inner).unwrap().common.size.width - 100.0).abs() < 1e-4);
        for leaf in leaves {
            assert!((tree.get(leaf).unwrap().common.size.width - 50.0).abs() < 1e-4);
        }
        assert_eq!(update_dirty_layouts(&mut tree), 0);
    }

    #[test]
    fn empty_dirty_container_does_not_spin() {
        let mut tree = SceneTree::new();
        let lonely = tree.insert(container(LayoutConfig::horizontal(), Size::new(50.0, 10.0)));
        assert!(tree.mark_layout_dirty(lonely));
        assert_eq!(update_dirty_layouts(&mut tree), 0);
        assert!(tree.get(lonely).unwrap().as_layout().unwrap().layout.is_dirty());
    }
}

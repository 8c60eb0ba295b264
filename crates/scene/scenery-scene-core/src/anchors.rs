//! Widget anchor bookkeeping: which nodes carry an anchor and whether they have been
//! aligned yet.

use indexmap::IndexMap;

use crate::node::NodeKind;
use crate::tree::SceneTree;
use scenery_api_core::{NodeId, Size, Vec2};
use scenery_layout_core::{align, AnchorBox, ParentFrame};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct AnchorState {
    aligned: bool,
}

#[derive(Clone, Debug)]
pub struct AnchorManager {
    entries: IndexMap<NodeId, AnchorState>,
    viewport: ParentFrame,
}

impl Default for AnchorManager {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Size::new(960.0, 640.0))
    }
}

impl AnchorManager {
    /// `origin` and `size` describe the visible viewport used by root-level nodes.
    pub fn new(origin: Vec2, size: Size) -> Self {
        Self {
            entries: IndexMap::new(),
            viewport: ParentFrame::viewport(origin, size),
        }
    }

    pub fn set_viewport(&mut self, origin: Vec2, size: Size) {
        self.viewport = ParentFrame::viewport(origin, size);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn register(&mut self, id: NodeId) {
        self.entries.entry(id).or_default();
    }

    pub fn register_all(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        for id in ids {
            self.register(id);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Align every registered anchor, once-only ones included.
    pub fn align_all(&mut self, tree: &mut SceneTree) {
        self.prune(tree);
        let viewport = self.viewport;
        for (id, state) in self.entries.iter_mut() {
            align_node(tree, *id, viewport);
            state.aligned = true;
        }
    }

    /// Align only anchors registered since the last alignment.
    pub fn align_new(&mut self, tree: &mut SceneTree) -> usize {
        self.prune(tree);
        let viewport = self.viewport;
        let mut count = 0;
        for (id, state) in self.entries.iter_mut().filter(|(_, s)| !s.aligned) {
            align_node(tree, *id, viewport);
            state.aligned = true;
            count += 1;
        }
        count
    }

    /// Re-align anchors that follow their parent every tick.
    pub fn align_continuous(&self, tree: &mut SceneTree) {
        let viewport = self.viewport;
        for id in self.entries.keys() {
            let continuous = tree
                .get(*id)
                .and_then(|n| n.common.widget.as_ref())
                .is_some_and(|w| !w.align_once);
            if continuous {
                align_node(tree, *id, viewport);
            }
        }
    }

    /// Re-align every registered anchor in `root`'s subtree, once-only ones included.
    pub fn force_align(&mut self, tree: &mut SceneTree, root: NodeId) -> usize {
        let viewport = self.viewport;
        let mut count = 0;
        for id in tree.descendants(root) {
            if let Some(state) = self.entries.get_mut(&id) {
                align_node(tree, id, viewport);
                state.aligned = true;
                count += 1;
            }
        }
        count
    }

    fn prune(&mut self, tree: &SceneTree) {
        self.entries.retain(|id, _| tree.contains(*id));
    }
}

/// Align one node against its parent, or the viewport when it sits under a scene.
pub fn align_node(tree: &mut SceneTree, id: NodeId, viewport: ParentFrame) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    let Some(widget) = node.common.widget.clone() else {
        return false;
    };
    let frame = match tree.parent(id).and_then(|p| tree.get(p)) {
        Some(parent) if !matches!(parent.kind, NodeKind::Scene) => {
            ParentFrame::of_parent(parent.common.anchor, parent.common.size)
        }
        _ => viewport,
    };
    let mut b = AnchorBox {
        position: node.common.authoring_position,
        size: node.common.size,
        anchor: node.common.anchor,
        scale: node.common.scale,
    };
    align(&widget, &mut b, frame);
    tree.set_content_size(id, b.size);
    tree.set_authoring_position(id, b.position);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeCommon};
    use approx::assert_relative_eq;
    use scenery_layout_core::{AlignFlags, WidgetAnchor};

    fn parent(size: Size) -> Node {
        Node::new(
            NodeCommon {
                size,
                ..NodeCommon::default()
            },
            NodeKind::Plain,
        )
    }

    fn anchored(widget: WidgetAnchor) -> Node {
        Node::new(
            NodeCommon {
                size: Size::new(20.0, 20.0),
                widget: Some(widget),
                ..NodeCommon::default()
            },
            NodeKind::Plain,
        )
    }

    #[test]
    fn stretch_against_parent() {
        let mut tree = SceneTree::new();
        let p = tree.insert(parent(Size::new(200.0, 100.0)));
        let c = tree.insert(anchored(WidgetAnchor {
            flags: AlignFlags::LEFT | AlignFlags::RIGHT,
            left: 0.1,
            right: 0.1,
            ..WidgetAnchor::default()
        }));
        tree.attach(p, c);

        let mut anchors = AnchorManager::default();
        anchors.register(c);
        anchors.align_all(&mut tree);
        let node = tree.get(c).unwrap();
        assert_relative_eq!(node.common.size.width, 160.0, epsilon = 1e-4);
        assert_relative_eq!(node.common.authoring_position.x, 0.0, epsilon = 1e-4);
        // Runtime position is measured from the parent's corner.
        assert_relative_eq!(node.common.position.x, 100.0, epsilon = 1e-4);
    }

    #[test]
    fn root_level_nodes_use_the_viewport() {
        let mut tree = SceneTree::new();
        let scene = tree.insert(Node::new(NodeCommon::default(), NodeKind::Scene));
        let c = tree.insert(anchored(WidgetAnchor {
            flags: AlignFlags::LEFT,
            left: 5.0,
            absolute_left: true,
            ..WidgetAnchor::default()
        }));
        tree.attach(scene, c);

        let mut anchors = AnchorManager::new(Vec2::new(100.0, 0.0), Size::new(400.0, 300.0));
        anchors.register(c);
        assert_eq!(anchors.align_new(&mut tree), 1);
        assert_eq!(anchors.align_new(&mut tree), 0);
        assert!((tree.get(c).unwrap().common.position.x - 115.0).abs() < 1e-4);
    }

    #[test]
    fn continuous_anchors_follow_parent_resizes() {
        let mut tree = SceneTree::new();
        let p = tree.insert(parent(Size::new(100.0, 100.0)));
        let once = tree.insert(anchored(WidgetAnchor {
            flags: AlignFlags::RIGHT,
            absolute_right: true,
            align_once: true,
            ..WidgetAnchor::default()
        }));
        let live = tree.insert(anchored(WidgetAnchor {
            flags: AlignFlags::RIGHT,
            absolute_right: true,
            ..WidgetAnchor::default()
        }));
        tree.attach(p, once);
        tree.attach(p, live);
        let mut anchors = AnchorManager::default();
        anchors.register_all([once, live]);
        anchors.align_all(&mut tree);

        tree.set_content_size(p, Size::new(300.0, 100.0));
        anchors.align_continuous(&mut tree);
        assert!((tree.get(once).unwrap().common.authoring_position.x - 40.0).abs() < 1e-4);
        assert!((tree.get(live).unwrap().common.authoring_position.x - 140.0).abs() < 1e-4);

        assert_eq!(anchors.force_align(&mut tree, p), 2);
        assert!((tree.get(once).unwrap().common.authoring_position.x - 140.0).abs() < 1e-4);
    }

    #[test]
    fn removed_nodes_are_pruned() {
        let mut tree = SceneTree::new();
        let c = tree.insert(anchored(WidgetAnchor::default()));
        let mut anchors = AnchorManager::default();
        anchors.register(c);
        tree.remove(c);
        anchors.align_all(&mut tree);
        assert!(anchors.is_empty());
    }
}

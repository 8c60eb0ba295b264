//! Post-decode coordinate passes.
//!
//! Authored positions are relative to the parent's anchor point; the runtime frame
//! puts the origin at the parent's bottom-left corner. Nodes directly under a scene
//! are unaffected.

use crate::tree::SceneTree;
use scenery_api_core::{NodeId, Vec2};

/// Re-derive every runtime position in `root`'s subtree from its authoring position.
pub fn shift_origin(tree: &mut SceneTree, root: NodeId) {
    for id in tree.descendants(root) {
        let Some(authoring) = tree.get(id).map(|n| n.common.authoring_position) else {
            continue;
        };
        tree.set_authoring_position(id, authoring);
    }
}

/// Center a design resolution inside the host frame by moving the root's children.
pub fn apply_position_diff(tree: &mut SceneTree, root: NodeId, diff: Vec2) {
    if diff == Vec2::ZERO {
        return;
    }
    let children = tree.children(root).to_vec();
    for id in children {
        if let Some(node) = tree.get_mut(id) {
            node.common.authoring_position += diff;
            node.common.position += diff;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeCommon, NodeKind};
    use scenery_api_core::Size;

    fn at(x: f32, y: f32, size: Size, kind: NodeKind) -> Node {
        Node::new(
            NodeCommon {
                position: Vec2::new(x, y),
                authoring_position: Vec2::new(x, y),
                size,
                ..NodeCommon::default()
            },
            kind,
        )
    }

    #[test]
    fn shift_skips_scene_children_and_offsets_the_rest() {
        let mut tree = SceneTree::new();
        let scene = tree.insert(at(0.0, 0.0, Size::new(960.0, 640.0), NodeKind::Scene));
        let panel = tree.insert(at(480.0, 320.0, Size::new(200.0, 100.0), NodeKind::Plain));
        let icon = tree.insert(at(-50.0, 0.0, Size::new(10.0, 10.0), NodeKind::Plain));
        tree.attach(scene, panel);
        tree.attach(panel, icon);

        shift_origin(&mut tree, scene);
        assert_eq!(tree.get(panel).unwrap().common.position, Vec2::new(480.0, 320.0));
        assert_eq!(tree.get(icon).unwrap().common.position, Vec2::new(50.0, 50.0));
        assert_eq!(tree.get(icon).unwrap().common.authoring_position, Vec2::new(-50.0, 0.0));

        // Running it again changes nothing.
        shift_origin(&mut tree, scene);
        assert_eq!(tree.get(icon).unwrap().common.position, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn diff_moves_direct_children_only() {
        let mut tree = SceneTree::new();
        let scene = tree.insert(at(0.0, 0.0, Size::ZERO, NodeKind::Scene));
        let a = tree.insert(at(10.0, 10.0, Size::new(4.0, 4.0), NodeKind::Plain));
        let b = tree.insert(at(1.0, 1.0, Size::ZERO, NodeKind::Plain));
        tree.attach(scene, a);
        tree.attach(a, b);

        apply_position_diff(&mut tree, scene, Vec2::new(88.0, 0.0));
        let a = &tree.get(a).unwrap().common;
        assert_eq!(a.position, Vec2::new(98.0, 10.0));
        assert_eq!(a.authoring_position, Vec2::new(98.0, 10.0));
        assert_eq!(tree.get(b).unwrap().common.authoring_position, Vec2::new(1.0, 1.0));
    }
}

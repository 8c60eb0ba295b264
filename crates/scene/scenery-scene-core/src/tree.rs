//! Generational arena holding every node of one or more trees.
//!
//! Handles carry the slot generation, so a handle to a removed node resolves to
//! nothing even after its slot has been reused.

use crate::error::LookupMiss;
use crate::node::{Node, NodeKind};
use scenery_api_core::{NodeId, NodePath, Size, Vec2};

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Clone, Debug, Default)]
pub struct SceneTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert a detached node.
    pub fn insert(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::new(index, 0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, LookupMiss> {
        self.get(id).ok_or(LookupMiss::Node(id))
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Every live node id, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.node
                .as_ref()
                .map(|_| NodeId::new(i as u32, slot.generation))
        })
    }

    /// `root` and its descendants in depth-first pre-order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Number of ancestors above `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            depth += 1;
            cur = self.parent(p);
        }
        depth
    }

    /// Attach `child` under `parent` without touching any layout state.
    pub fn attach_no_dirty(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || parent == child {
            return false;
        }
        self.detach(child);
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        true
    }

    /// Attach `child` under `parent`, marking a layout parent dirty.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        let attached = self.attach_no_dirty(parent, child);
        if attached {
            self.mark_layout_dirty(parent);
        }
        attached
    }

    /// Set the parent link without listing `child` among the parent's children.
    pub(crate) fn adopt_hidden(&mut self, parent: NodeId, child: NodeId) {
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Unlink `child` from its parent. The subtree stays in the arena.
    pub fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = None;
        }
        self.mark_layout_dirty(parent);
    }

    /// Remove `id` and its whole subtree. Returns the removed ids.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.detach(id);
        let mut doomed = self.descendants(id);
        // Captions are parented but not listed as children.
        let captions: Vec<NodeId> = doomed
            .iter()
            .filter_map(|n| match self.get(*n).map(|n| &n.kind) {
                Some(NodeKind::Button(b)) => b.title,
                _ => None,
            })
            .collect();
        doomed.extend(captions);
        for n in &doomed {
            let Some(slot) = self.slots.get_mut(n.index()) else {
                continue;
            };
            if slot.generation == n.generation() && slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(n.index() as u32);
                self.live -= 1;
            }
        }
        doomed
    }

    /// First node named by `path` below `root`.
    ///
    /// Each segment matches the first node with that name in depth-first order below
    /// the node matched by the previous segment. The empty path is `root` itself.
    pub fn find_path(&self, root: NodeId, path: &NodePath) -> Option<NodeId> {
        let mut cur = root;
        if !self.contains(cur) {
            return None;
        }
        for segment in path.segments() {
            cur = self.find_named(cur, segment)?;
        }
        Some(cur)
    }

    fn find_named(&self, under: NodeId, name: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(under).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.get(id)?;
            if node.common.name == name {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Mark `id` dirty if it is a layout container.
    pub fn mark_layout_dirty(&mut self, id: NodeId) -> bool {
        match self.get_mut(id).and_then(Node::as_layout_mut) {
            Some(l) => {
                l.layout.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Offset from a node's authoring frame to its runtime frame: the parent's anchor
    /// point, except directly under a scene.
    pub fn origin_offset(&self, id: NodeId) -> Vec2 {
        let Some(parent) = self.parent(id).and_then(|p| self.get(p)) else {
            return Vec2::ZERO;
        };
        if matches!(parent.kind, NodeKind::Scene) {
            return Vec2::ZERO;
        }
        Vec2::anchor_offset(parent.common.anchor, parent.common.size)
    }

    /// Set the authoring position and re-derive the runtime position from it.
    pub fn set_authoring_position(&mut self, id: NodeId, position: Vec2) {
        let offset = self.origin_offset(id);
        if let Some(node) = self.get_mut(id) {
            node.common.authoring_position = position;
            node.common.position = position + offset;
        }
    }

    /// Resize a node. A layout container, or the layout it sits in, goes dirty.
    pub fn set_content_size(&mut self, id: NodeId, size: Size) {
        let Some(node) = self.get_mut(id) else { return };
        if node.common.size == size {
            return;
        }
        node.common.size = size;
        let parent = node.parent;
        self.mark_layout_dirty(id);
        if let Some(p) = parent {
            self.mark_layout_dirty(p);
        }
    }

    /// Show or hide a node. A layout parent goes dirty when visibility changes.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        let Some(node) = self.get_mut(id) else { return };
        if node.common.visible == visible {
            return;
        }
        node.common.visible = visible;
        if let Some(p) = node.parent {
            self.mark_layout_dirty(p);
        }
    }
}

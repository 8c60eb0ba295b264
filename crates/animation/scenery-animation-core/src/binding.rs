//! Clip bindings and the host seam.
//!
//! A binding ties a set of clips to the node that owns them. Curve paths inside
//! those clips are resolved against the binding's target through [`AnimationHost`]
//! every time they are applied, so nodes added or renamed after binding are found.

use crate::data::PropertyKind;
use crate::ids::{BindingId, ClipId};
use scenery_api_core::{NodeId, NodePath, Value};

/// What the engine needs from whatever owns the nodes.
pub trait AnimationHost {
    /// First node at `path` below `root` (depth-first), or `root` for the empty path.
    fn resolve(&self, root: NodeId, path: &NodePath) -> Option<NodeId>;

    /// Apply one sampled value. Returns false when the node or property is not applicable.
    fn apply(&mut self, target: NodeId, property: PropertyKind, value: &Value) -> bool;
}

#[derive(Clone, Debug)]
pub struct AnimationBinding {
    pub id: BindingId,
    pub target: NodeId,
    pub clips: Vec<ClipId>,
    pub default_clip: Option<ClipId>,
    pub play_on_load: bool,
    /// False for bindings created while loading a prefab.
    pub attached_to_scene: bool,
}

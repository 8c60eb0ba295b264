//! scenery-scene-core: the node tree and everything that reads, writes or drives it.
//!
//! - [`decode`] builds a bincode [`Document`] into a caller's [`SceneTree`] and
//!   returns the bindings, layouts and anchors the runtime registers.
//! - [`encode`] writes a tree back out.
//! - [`layouts`], [`AnchorManager`] and [`SceneHost`] run layout, widget anchors and
//!   animation against a live tree.

pub mod anchors;
pub mod collab;
pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod host;
pub mod layouts;
pub mod node;
pub mod settings;
pub mod shift;
pub mod tree;

pub use anchors::{align_node, AnchorManager};
pub use collab::{
    ColliderDesc, ColliderSet, ColliderShape, CollisionBuilder, DecodeContext, FrameTable,
    PlainTextParser, RichRun, RichTextLayout, RichTextParser, SpriteFrame, SpriteFrameResolver,
};
pub use decode::{decode, decode_document, DecodedDocument, MAX_NODE_DEPTH};
pub use document::{AnyNode, Document, DocumentHeader, NodeRecord, NodeTree};
pub use encode::{encode, to_document};
pub use error::{DecodeError, EncodeError, LookupMiss};
pub use host::SceneHost;
pub use layouts::{hide_child, show_child, update_dirty_layouts, update_layout, visible_children_range};
pub use node::{Node, NodeCommon, NodeKind, SpriteSource};
pub use settings::{DecodeSettings, ResolutionPolicy};
pub use shift::{apply_position_diff, shift_origin};
pub use tree::SceneTree;

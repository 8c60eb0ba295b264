//! scenery-api-core: shared values, geometry and node handles (engine-agnostic)

pub mod geometry;
pub mod handle;
pub mod node_path;
pub mod value;

pub use geometry::{Color3, Color4, Rect, Size, Vec2};
pub use handle::NodeId;
pub use node_path::{NodePath, PathError};
pub use value::{Value, ValueKind};

//! scenery-layout-core: container flow/grid layout and widget anchor alignment.
//!
//! Everything here operates on plain data ([`LayoutItem`], [`ContainerBox`],
//! [`AnchorBox`]) so the algorithms can be driven by any node store.

mod axis;
pub mod anchor;
pub mod config;
pub mod container;
pub mod culling;
pub mod flow;
pub mod item;

pub use anchor::{align, AlignFlags, AnchorBox, ParentFrame, WidgetAnchor};
pub use axis::Axis;
pub use config::{
    AxisDirection, HorizontalDirection, LayoutConfig, LayoutKind, Padding, ResizeMode,
    VerticalDirection,
};
pub use container::{recompute, ContainerBox, LayoutNode};
pub use culling::{visible_range, ScrollDirection};
pub use item::LayoutItem;

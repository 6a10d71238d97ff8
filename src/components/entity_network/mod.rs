//! Entity relationship network: layout simulation and its canvas view.

mod component;
mod layout;
mod render;
mod state;
mod types;

pub use component::EntityNetwork;
pub use layout::{Layout, LayoutEdge, LayoutNode, LayoutParams, LayoutStatus, Vec2, ViewTransform};
pub use types::{GraphData, GraphEdge, GraphNode};

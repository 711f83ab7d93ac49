pub mod event;
pub mod id;
pub mod layout;
pub mod model;
pub mod transform;
pub mod tree;

pub use event::{DocEvent, NodePatch};
pub use id::NodeId;
pub use layout::{LayoutResult, compute_layout};
pub use model::*;
pub use transform::{
    Handle, MIN_SIZE, ResizeMode, angle_between, resize, rotate, scale_from_bounds, translate,
};
pub use tree::ApplyError;

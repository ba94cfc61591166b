//! Scene graph module
//!
//! - [`Node`]: scene node (hierarchy + transform + mesh hints)
//! - [`Transform`]: position, rotation, scale with cached matrices
//! - [`Scene`]: node arena and root list
//! - [`Camera`]: perspective camera with picking rays
//! - [`transform_system`]: world-matrix propagation

pub mod camera;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use node::{MeshFlags, Node};
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}

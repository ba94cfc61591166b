use crate::scene::NodeHandle;
use crate::scene::transform::Transform;
use glam::Affine3A;

/// Render hints attached to nodes that carry a mesh.
///
/// Geometry itself is owned by the renderer; the scene graph only records how
/// the mesh should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshFlags {
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Skinned characters close to the camera confuse bounding-volume culling,
    /// so loaded meshes turn it off.
    pub frustum_culled: bool,
    pub skinned: bool,
}

impl Default for MeshFlags {
    fn default() -> Self {
        Self {
            cast_shadow: false,
            receive_shadow: false,
            frustum_culled: true,
            skinned: false,
        }
    }
}

/// A scene graph node.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child handles:
/// - `parent`: handle of the parent node (`None` for roots)
/// - `children`: handles of the child nodes
///
/// # Transform
///
/// Each node owns a [`Transform`] with the local TRS plus cached matrices.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    /// Present when the node references a mesh.
    pub mesh: Option<MeshFlags>,

    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            mesh: None,
            visible: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Returns a reference to the world transformation matrix.
    ///
    /// Refreshed by [`Scene::update_matrix_world`](crate::scene::Scene::update_matrix_world).
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}

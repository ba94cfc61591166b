use crate::scene::NodeHandle;

/// The node property a track writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    /// `transform.position`
    Translation,
    /// `transform.rotation`
    Rotation,
    /// `transform.scale`
    Scale,
}

/// Maps track `track_index` of a clip onto the `target` property of `node_handle`.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
}

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves each track of `clip` to a node under `root` by name.
    ///
    /// Tracks whose node is missing are dropped; an asset variant without a
    /// given bone still plays the rest of the clip.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let subtree = scene.descendants(root);
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let node = subtree
                .iter()
                .copied()
                .find(|&h| scene.get_node(h).is_some_and(|n| n.name == track.meta.node_name));

            match node {
                Some(node_handle) => bindings.push(PropertyBinding {
                    track_index,
                    node_handle,
                    target: track.meta.target,
                }),
                None => log::debug!(
                    "Clip '{}': no node named '{}', track skipped",
                    clip.name,
                    track.meta.node_name
                ),
            }
        }

        bindings
    }
}

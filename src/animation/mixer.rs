use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::animation::values::Interpolatable;
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct ActionHandle;
}

type PropertyKey = (NodeHandle, TargetPath);

/// Owns the actions of one animated subtree and writes their blended pose
/// into the scene.
///
/// Actions are cached per clip name, the way `clipAction` behaves in
/// three.js: asking twice for the same clip yields the same handle.
///
/// # Blending
///
/// Each frame every property is accumulated across actions by effective
/// weight. When the summed weight is below 1 the remainder is filled from the
/// rest pose captured at bind time, so a fading action eases back to the
/// bind pose instead of snapping. Bound properties that no action touches
/// this frame are reset to their rest pose.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: SlotMap<ActionHandle, AnimationAction>,
    by_clip: FxHashMap<String, ActionHandle>,
    rest_pose: FxHashMap<PropertyKey, TrackValue>,
    time: f32,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: SlotMap::with_key(),
            by_clip: FxHashMap::default(),
            rest_pose: FxHashMap::default(),
            time: 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Total mixer time in seconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Returns the cached action for `clip`, binding a new one on first use.
    pub fn clip_action(&mut self, clip: &Arc<AnimationClip>, scene: &Scene) -> ActionHandle {
        if let Some(&handle) = self.by_clip.get(&clip.name)
            && self.actions.contains_key(handle)
        {
            return handle;
        }

        let bindings = Binder::bind(scene, self.root, clip);
        for binding in &bindings {
            let key = (binding.node_handle, binding.target);
            if self.rest_pose.contains_key(&key) {
                continue;
            }
            if let Some(node) = scene.get_node(binding.node_handle) {
                let rest = match binding.target {
                    TargetPath::Translation => TrackValue::Vector3(node.transform.position),
                    TargetPath::Rotation => TrackValue::Quaternion(node.transform.rotation),
                    TargetPath::Scale => TrackValue::Vector3(node.transform.scale),
                };
                self.rest_pose.insert(key, rest);
            }
        }

        let mut action = AnimationAction::new(Arc::clone(clip));
        action.bindings = bindings;
        let handle = self.actions.insert(action);
        self.by_clip.insert(clip.name.clone(), handle);
        handle
    }

    #[inline]
    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    #[inline]
    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionHandle, &AnimationAction)> {
        self.actions.iter()
    }

    /// Number of actions currently contributing to the pose.
    #[must_use]
    pub fn active_action_count(&self) -> usize {
        self.actions.values().filter(|a| a.effective_weight() > 0.0).count()
    }

    /// Fades `from` out and `to` in over the same window.
    pub fn cross_fade(&mut self, from: ActionHandle, to: ActionHandle, duration: f32) {
        if let Some(action) = self.actions.get_mut(from) {
            action.fade_out(duration);
        }
        if let Some(action) = self.actions.get_mut(to) {
            action.fade_in(duration);
        }
    }

    pub fn stop_all_action(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    /// Advances all actions by `dt` and writes the blended pose into `scene`.
    ///
    /// Returns the actions that finished during this step.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) -> Vec<ActionHandle> {
        self.time += dt;

        let mut finished = Vec::new();
        for (handle, action) in &mut self.actions {
            if action.update(dt) {
                finished.push(handle);
            }
        }

        let mut accumulated: FxHashMap<PropertyKey, (f32, TrackValue)> = FxHashMap::default();

        for action in self.actions.values_mut() {
            let weight = action.effective_weight();
            if weight <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let (track_index, key) = {
                    let b = &action.bindings[i];
                    (b.track_index, (b.node_handle, b.target))
                };
                let Some(value) = action.sample_track(track_index) else {
                    continue;
                };

                accumulated
                    .entry(key)
                    .and_modify(|(acc_weight, acc_value)| {
                        let total = *acc_weight + weight;
                        *acc_value = blend(*acc_value, value, weight / total);
                        *acc_weight = total;
                    })
                    .or_insert((weight, value));
            }
        }

        for (key, rest) in &self.rest_pose {
            let value = match accumulated.get(key) {
                Some(&(weight, value)) if weight < 1.0 => blend(*rest, value, weight),
                Some(&(_, value)) => value,
                None => *rest,
            };
            apply(scene, *key, value);
        }

        finished
    }
}

fn blend(a: TrackValue, b: TrackValue, t: f32) -> TrackValue {
    match (a, b) {
        (TrackValue::Vector3(a), TrackValue::Vector3(b)) => TrackValue::Vector3(Interpolatable::interpolate_linear(a, b, t)),
        (TrackValue::Quaternion(a), TrackValue::Quaternion(b)) => {
            TrackValue::Quaternion(Interpolatable::interpolate_linear(a, b, t))
        }
        (_, b) => b,
    }
}

fn apply(scene: &mut Scene, (node_handle, target): PropertyKey, value: TrackValue) {
    let Some(node) = scene.get_node_mut(node_handle) else {
        return;
    };

    match (target, value) {
        (TargetPath::Translation, TrackValue::Vector3(v)) => node.transform.position = v,
        (TargetPath::Scale, TrackValue::Vector3(v)) => node.transform.scale = v,
        (TargetPath::Rotation, TrackValue::Quaternion(q)) => node.transform.rotation = q,
        _ => {}
    }
}

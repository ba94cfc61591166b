//! Procedural head look-at.
//!
//! [`HeadLookController`] aims one bone at a point under the pointer. It runs
//! in two phases per frame:
//!
//! 1. [`update_target`](HeadLookController::update_target): pointer → camera
//!    ray → plane in front of the camera, then exponential smoothing.
//! 2. [`apply`](HeadLookController::apply): after the mixer has posed the
//!    skeleton, overwrite the bone's local rotation with a smoothed world
//!    orientation expressed in its parent's space.
//!
//! While the override is off, the bone gets back the rotation it had before
//! the first write, unless the mixer has posed it again since.
//!
//! Smoothing factors are per-frame constants, so the perceived speed depends
//! on the refresh rate.

use std::f32::consts::PI;

use glam::{Mat3, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::{Camera, NodeHandle, Scene};
use crate::utils::Plane;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadLookConfig {
    /// Name of the bone to aim.
    pub bone_name: String,
    /// Distance from the camera to the target plane, along the view axis.
    pub plane_distance: f32,
    /// Per-frame lerp factor of the look target, in (0, 1].
    pub target_smoothing: f32,
    /// Per-frame slerp factor of the bone orientation, in (0, 1].
    pub rotation_smoothing: f32,
    /// Engage as soon as a model is installed when no intro sequence is
    /// configured. With an intro, tracking starts when the intro completes.
    pub auto_enable: bool,
}

impl Default for HeadLookConfig {
    fn default() -> Self {
        Self {
            bone_name: "Head".to_string(),
            plane_distance: 2.0,
            target_smoothing: 0.1,
            rotation_smoothing: 0.15,
            auto_enable: true,
        }
    }
}

/// Converts screen pixels to mirrored normalized device coordinates.
///
/// Both axes are flipped relative to the usual NDC mapping, which together
/// with the 180° yaw in [`HeadLookController::apply`] makes the character
/// look toward the cursor side as displayed. Returns `None` for an empty
/// viewport.
#[must_use]
pub fn pointer_to_ndc(pointer: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(1.0 - 2.0 * pointer.x / viewport.x, 2.0 * pointer.y / viewport.y - 1.0))
}

/// Rotation whose +Z axis points from `eye` to `target`.
///
/// `None` when the two points coincide or the direction is parallel to `up`.
#[must_use]
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
    let z = (target - eye).try_normalize()?;
    let x = up.cross(z).try_normalize()?;
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}

#[derive(Debug, Clone)]
pub struct HeadLookController {
    config: HeadLookConfig,
    enabled: bool,
    bone: Option<NodeHandle>,

    raw_target: Option<Vec3>,
    smoothed_target: Option<Vec3>,
    desired: Option<Quat>,
    smoothed_orientation: Option<Quat>,

    /// Local rotation the bone had before the override last took hold.
    animated_rotation: Option<Quat>,
    /// Local rotation the override last wrote.
    written_rotation: Option<Quat>,
}

impl HeadLookController {
    #[must_use]
    pub fn new(config: HeadLookConfig) -> Self {
        Self {
            config,
            enabled: false,
            bone: None,
            raw_target: None,
            smoothed_target: None,
            desired: None,
            smoothed_orientation: None,
            animated_rotation: None,
            written_rotation: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &HeadLookConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the override on re-seeds the orientation from the animated
    /// pose on the next [`apply`](Self::apply).
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.smoothed_orientation = None;
        }
        self.enabled = enabled;
    }

    #[inline]
    #[must_use]
    pub fn bone(&self) -> Option<NodeHandle> {
        self.bone
    }

    /// Sets the bone to drive. Clears the orientation state.
    pub fn set_bone(&mut self, bone: Option<NodeHandle>) {
        self.bone = bone;
        self.desired = None;
        self.smoothed_orientation = None;
        self.animated_rotation = None;
        self.written_rotation = None;
    }

    /// Looks up the configured bone by name under `root`.
    pub fn resolve_bone(&mut self, scene: &Scene, root: NodeHandle) -> Option<NodeHandle> {
        let bone = scene.find_node_by_name(root, &self.config.bone_name);
        if bone.is_none() {
            log::warn!("Head bone '{}' not found; head tracking disabled for this model", self.config.bone_name);
        }
        self.set_bone(bone);
        bone
    }

    #[inline]
    #[must_use]
    pub fn raw_target(&self) -> Option<Vec3> {
        self.raw_target
    }

    #[inline]
    #[must_use]
    pub fn smoothed_target(&self) -> Option<Vec3> {
        self.smoothed_target
    }

    #[inline]
    #[must_use]
    pub fn smoothed_orientation(&self) -> Option<Quat> {
        self.smoothed_orientation
    }

    /// Forgets targets and orientation, e.g. when a model is removed.
    pub fn reset(&mut self) {
        self.enabled = false;
        self.bone = None;
        self.raw_target = None;
        self.smoothed_target = None;
        self.desired = None;
        self.smoothed_orientation = None;
        self.animated_rotation = None;
        self.written_rotation = None;
    }

    /// Recomputes the raw look target from `ndc` and moves the smoothed
    /// target toward it.
    ///
    /// The target plane faces the camera at `plane_distance` along its view
    /// axis. If the ray misses the plane the previous raw target is kept.
    pub fn update_target(&mut self, camera: &Camera, ndc: Vec2) {
        let forward = camera.forward();
        let plane = Plane::from_normal_and_point(forward, camera.position() + forward * self.config.plane_distance);

        if let Some(hit) = camera.ray_from_ndc(ndc).intersect_plane(&plane) {
            self.raw_target = Some(hit);
        }

        let Some(raw) = self.raw_target else {
            return;
        };
        self.smoothed_target = Some(match self.smoothed_target {
            Some(current) => current.lerp(raw, self.config.target_smoothing),
            None => raw,
        });
    }

    /// Overrides the bone's local rotation. Returns `true` if the pose was
    /// touched.
    ///
    /// World matrices must reflect this frame's animated pose. The caller
    /// refreshes the bone's subtree afterwards. When disabled, the first call
    /// hands the bone back to its animated rotation.
    pub fn apply(&mut self, scene: &mut Scene) -> bool {
        let Some(bone) = self.bone else {
            return false;
        };
        if !self.enabled {
            return self.release(scene, bone);
        }
        let Some(target) = self.smoothed_target else {
            return false;
        };
        let Some(node) = scene.get_node(bone) else {
            return false;
        };

        let current = node.transform.rotation;
        if self.written_rotation != Some(current) {
            self.animated_rotation = Some(current);
        }

        let bone_position = node.transform.world_position();
        let bone_world_rotation = node.transform.world_rotation();
        let parent_world_rotation = node
            .parent()
            .and_then(|p| scene.get_node(p))
            .map_or(Quat::IDENTITY, |p| p.transform.world_rotation());

        if let Some(look) = look_rotation(bone_position, target, Vec3::Y) {
            self.desired = Some((look * Quat::from_rotation_y(PI)).normalize());
        }

        let smoothed = match (self.smoothed_orientation, self.desired) {
            (None, _) => bone_world_rotation,
            (Some(current), Some(desired)) => current.slerp(desired, self.config.rotation_smoothing).normalize(),
            (Some(current), None) => current,
        };
        self.smoothed_orientation = Some(smoothed);

        let local = (parent_world_rotation.inverse() * smoothed).normalize();
        match scene.get_node_mut(bone) {
            Some(node) => {
                node.transform.rotation = local;
                self.written_rotation = Some(local);
                true
            }
            None => false,
        }
    }

    /// Restores the animated rotation if the bone still holds the override.
    fn release(&mut self, scene: &mut Scene, bone: NodeHandle) -> bool {
        let Some(written) = self.written_rotation.take() else {
            return false;
        };
        let animated = self.animated_rotation.take();
        match (scene.get_node_mut(bone), animated) {
            (Some(node), Some(animated)) if node.transform.rotation == written => {
                node.transform.rotation = animated;
                true
            }
            _ => false,
        }
    }
}

//! Shared fixtures for the integration tests: a small head/neck rig, clip
//! builders and an in-memory glTF document.

#![allow(dead_code)]

use std::sync::Arc;

use base64::Engine;
use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use serde_json::json;

use avatar_viewer::animation::binding::TargetPath;
use avatar_viewer::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use avatar_viewer::animation::tracks::{InterpolationMode, KeyframeTrack};
use avatar_viewer::assets::SceneAsset;
use avatar_viewer::scene::{Node, NodeHandle, Scene};

pub const EPSILON: f32 = 1e-4;

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

/// Same orientation, either sign.
pub fn approx_quat(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 1.0 - EPSILON
}

// ============================================================================
// Rig
// ============================================================================

pub struct Rig {
    pub scene: Scene,
    pub root: NodeHandle,
    pub hips: NodeHandle,
    pub neck: NodeHandle,
    pub head: NodeHandle,
}

/// `gltf_root → Hips → Neck → Head`, with rotated ancestors so local and
/// world orientations differ.
pub fn rig() -> Rig {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("gltf_root"));

    let mut hips = Node::new("Hips");
    hips.transform.position = Vec3::new(0.0, 1.0, 0.0);
    hips.transform.rotation = Quat::from_rotation_y(0.4);
    let hips = scene.add_to_parent(hips, root);

    let mut neck = Node::new("Neck");
    neck.transform.position = Vec3::new(0.0, 0.5, 0.0);
    neck.transform.rotation = Quat::from_rotation_x(0.3);
    let neck = scene.add_to_parent(neck, hips);

    let mut head = Node::new("Head");
    head.transform.position = Vec3::new(0.0, 0.2, 0.0);
    head.transform.rotation = Quat::from_rotation_z(0.1);
    let head = scene.add_to_parent(head, neck);

    scene.update_matrix_world();

    Rig {
        scene,
        root,
        hips,
        neck,
        head,
    }
}

/// Wraps a rig into an installable asset.
pub fn rig_asset(clips: Vec<Arc<AnimationClip>>) -> SceneAsset {
    let rig = rig();
    let mut bones = FxHashMap::default();
    for (name, handle) in [("Hips", rig.hips), ("Neck", rig.neck), ("Head", rig.head)] {
        bones.insert(name.to_string(), handle);
    }
    SceneAsset {
        scene: rig.scene,
        root: rig.root,
        clips,
        bones,
        compression: None,
    }
}

// ============================================================================
// Clips
// ============================================================================

/// Moves `Hips` from the origin to `to` over `duration` seconds.
pub fn translation_clip(name: &str, duration: f32, to: Vec3) -> Arc<AnimationClip> {
    let track = Track {
        meta: TrackMeta {
            node_name: "Hips".to_string(),
            target: TargetPath::Translation,
        },
        data: TrackData::Vector3(KeyframeTrack::new(
            vec![0.0, duration],
            vec![Vec3::ZERO, to],
            InterpolationMode::Linear,
        )),
    };
    Arc::new(AnimationClip::new(name, vec![track]))
}

/// Turns `node_name` about Y from identity to `angle` over `duration` seconds.
pub fn rotation_clip(name: &str, node_name: &str, duration: f32, angle: f32) -> Arc<AnimationClip> {
    let track = Track {
        meta: TrackMeta {
            node_name: node_name.to_string(),
            target: TargetPath::Rotation,
        },
        data: TrackData::Quaternion(KeyframeTrack::new(
            vec![0.0, duration],
            vec![Quat::IDENTITY, Quat::from_rotation_y(angle)],
            InterpolationMode::Linear,
        )),
    };
    Arc::new(AnimationClip::new(name, vec![track]))
}

/// One translation clip per name, each 1 second long with a distinct target.
pub fn named_clips(names: &[&str]) -> Vec<Arc<AnimationClip>> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| translation_clip(name, 1.0, Vec3::new(i as f32 + 1.0, 0.0, 0.0)))
        .collect()
}

// ============================================================================
// glTF fixture
// ============================================================================

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A minimal skinned character as glTF JSON with an embedded buffer.
///
/// Nodes: `Armature → {Hips → Neck → Head, Body(mesh, skin)}` plus an
/// unnamed mesh node at the scene root. Animations: `Casual_Walk` (linear
/// Hips translation + Head rotation) and `Wave` (step Head rotation).
pub fn gltf_document(extensions_required: &[&str]) -> serde_json::Value {
    let s = std::f32::consts::FRAC_1_SQRT_2;
    let mut data = f32_bytes(&[0.0, 1.0]);
    data.extend(f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, s, 0.0, s]));
    data.extend(f32_bytes(&[0.0, 1.0, 0.0, 0.0, 1.0, 1.0]));
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&data)
    );

    let mut doc = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0, 5] }],
        "nodes": [
            { "name": "Armature", "children": [1, 4] },
            { "name": "Hips", "translation": [0.0, 1.0, 0.0], "children": [2] },
            { "name": "Neck", "translation": [0.0, 0.5, 0.0], "children": [3] },
            { "name": "Head", "translation": [0.0, 0.2, 0.0] },
            { "name": "Body", "mesh": 0, "skin": 0 },
            { "mesh": 0, "translation": [2.0, 0.0, 0.0] }
        ],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 2 } }] }],
        "skins": [{ "joints": [1, 2, 3] }],
        "buffers": [{ "byteLength": data.len(), "uri": uri }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 32 },
            { "buffer": 0, "byteOffset": 40, "byteLength": 24 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC4" },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3", "min": [0.0, 1.0, 0.0], "max": [0.0, 1.0, 1.0] }
        ],
        "animations": [
            {
                "name": "Casual_Walk",
                "samplers": [
                    { "input": 0, "output": 2, "interpolation": "LINEAR" },
                    { "input": 0, "output": 1, "interpolation": "LINEAR" }
                ],
                "channels": [
                    { "sampler": 0, "target": { "node": 1, "path": "translation" } },
                    { "sampler": 1, "target": { "node": 3, "path": "rotation" } }
                ]
            },
            {
                "name": "Wave",
                "samplers": [{ "input": 0, "output": 1, "interpolation": "STEP" }],
                "channels": [{ "sampler": 0, "target": { "node": 3, "path": "rotation" } }]
            }
        ]
    });

    if !extensions_required.is_empty() {
        doc["extensionsUsed"] = json!(extensions_required);
        doc["extensionsRequired"] = json!(extensions_required);
    }
    doc
}

pub fn gltf_bytes() -> Vec<u8> {
    serde_json::to_vec(&gltf_document(&[])).unwrap()
}

//! Asset Loading Tests
//!
//! Tests for:
//! - glTF decoding: hierarchy, naming, mesh flags, bones
//! - Animation extraction
//! - Required-extension handling and decoder configuration
//! - Data URI decoding and reader selection

mod common;

use glam::{Quat, Vec3};

use avatar_viewer::animation::binding::TargetPath;
use avatar_viewer::animation::clip::TrackData;
use avatar_viewer::animation::tracks::InterpolationMode;
use avatar_viewer::assets::io::AssetReaderVariant;
use avatar_viewer::assets::loader::decode_data_uri;
use avatar_viewer::assets::{AssetLoader, LoaderOptions, SceneAsset};
use avatar_viewer::errors::ViewerError;

use common::{approx, approx_quat, approx_vec3, gltf_bytes, gltf_document};

fn load(loader: &AssetLoader, bytes: &[u8]) -> Result<SceneAsset, ViewerError> {
    pollster::block_on(loader.load_from_slice(bytes, "."))
}

fn load_fixture() -> SceneAsset {
    load(&AssetLoader::default(), &gltf_bytes()).unwrap()
}

fn compressed_fixture() -> Vec<u8> {
    serde_json::to_vec(&gltf_document(&["KHR_draco_mesh_compression"])).unwrap()
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn default_scene_hangs_under_synthetic_root() {
    let asset = load_fixture();
    let root = asset.scene.get_node(asset.root).unwrap();

    assert_eq!(root.name, "gltf_root");
    assert_eq!(asset.scene.root_nodes, vec![asset.root]);
    let children: Vec<&str> = root
        .children()
        .iter()
        .map(|&h| asset.scene.get_node(h).unwrap().name.as_str())
        .collect();
    assert_eq!(children, vec!["Armature", "Node_5"]);
}

#[test]
fn node_transforms_propagate() {
    let asset = load_fixture();
    let head = asset.scene.find_node_by_name(asset.root, "Head").unwrap();
    let position = asset.scene.get_node(head).unwrap().transform.world_position();
    assert!(approx_vec3(position, Vec3::new(0.0, 1.7, 0.0)));
}

#[test]
fn mesh_nodes_carry_flags() {
    let asset = load_fixture();

    let body = asset.scene.find_node_by_name(asset.root, "Body").unwrap();
    let flags = asset.scene.get_node(body).unwrap().mesh.unwrap();
    assert!(flags.cast_shadow && flags.receive_shadow);
    assert!(flags.skinned);
    assert!(!flags.frustum_culled);

    let prop = asset.scene.find_node_by_name(asset.root, "Node_5").unwrap();
    assert!(!asset.scene.get_node(prop).unwrap().mesh.unwrap().skinned);

    let hips = asset.scene.find_node_by_name(asset.root, "Hips").unwrap();
    assert!(asset.scene.get_node(hips).unwrap().mesh.is_none());
}

#[test]
fn bones_are_indexed_by_name() {
    let asset = load_fixture();
    for name in ["Hips", "Neck", "Head", "Armature", "Body"] {
        assert!(asset.bone(name).is_some(), "missing '{name}'");
    }
    // Unnamed nodes are not listed.
    assert!(asset.bone("Node_5").is_none());
    assert_eq!(asset.bone("Head"), asset.scene.find_node_by_name(asset.root, "Head"));
}

// ============================================================================
// Animations
// ============================================================================

#[test]
fn clips_are_read_in_asset_order() {
    let asset = load_fixture();
    assert_eq!(asset.clip_names(), vec!["Casual_Walk", "Wave"]);

    let walk = &asset.clips[0];
    assert!(approx(walk.duration, 1.0));
    assert_eq!(walk.tracks.len(), 2);
    assert_eq!(walk.tracks[0].meta.node_name, "Hips");
    assert_eq!(walk.tracks[0].meta.target, TargetPath::Translation);
    assert_eq!(walk.tracks[1].meta.node_name, "Head");
    assert_eq!(walk.tracks[1].meta.target, TargetPath::Rotation);
}

#[test]
fn track_values_decode() {
    let asset = load_fixture();

    let TrackData::Vector3(translation) = &asset.clips[0].tracks[0].data else {
        panic!("expected a translation track");
    };
    assert!(approx_vec3(translation.sample(0.5).unwrap(), Vec3::new(0.0, 1.0, 0.5)));

    let TrackData::Quaternion(rotation) = &asset.clips[1].tracks[0].data else {
        panic!("expected a rotation track");
    };
    assert_eq!(rotation.interpolation, InterpolationMode::Step);
    assert!(approx_quat(rotation.sample(0.5).unwrap(), Quat::IDENTITY));
    assert!(approx_quat(
        rotation.sample(1.0).unwrap(),
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)
    ));
}

// ============================================================================
// Extensions
// ============================================================================

#[test]
fn compressed_asset_needs_decoder_path() {
    let err = load(&AssetLoader::default(), &compressed_fixture()).unwrap_err();
    assert!(matches!(err, ViewerError::DecoderUnavailable(ref ext) if ext == "KHR_draco_mesh_compression"));
}

#[test]
fn decoder_path_is_recorded() {
    let loader = AssetLoader::new(LoaderOptions {
        decoder_path: Some("/draco/".into()),
    });
    let asset = load(&loader, &compressed_fixture()).unwrap();
    let compression = asset.compression.unwrap();
    assert_eq!(compression.extension, "KHR_draco_mesh_compression");
    assert_eq!(compression.decoder_path, "/draco/");
}

#[test]
fn unknown_required_extension_only_warns() {
    let bytes = serde_json::to_vec(&gltf_document(&["KHR_materials_variants"])).unwrap();
    let asset = load(&AssetLoader::default(), &bytes).unwrap();
    assert!(asset.compression.is_none());
    assert_eq!(asset.clips.len(), 2);
}

#[test]
fn garbage_is_a_gltf_error() {
    let err = load(&AssetLoader::default(), b"definitely not a model").unwrap_err();
    assert!(matches!(err, ViewerError::GltfError(_)));
}

#[test]
fn short_buffer_is_rejected() {
    let mut doc = gltf_document(&[]);
    doc["buffers"][0]["byteLength"] = serde_json::json!(128);
    let bytes = serde_json::to_vec(&doc).unwrap();
    let err = load(&AssetLoader::default(), &bytes).unwrap_err();
    assert!(matches!(err, ViewerError::GltfError(_)));
}

#[test]
fn out_of_range_child_index_is_a_gltf_error() {
    let bytes = serde_json::to_vec(&serde_json::json!({
        "asset": { "version": "2.0" },
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "A", "children": [7] }]
    }))
    .unwrap();
    let err = load(&AssetLoader::default(), &bytes).unwrap_err();
    assert!(matches!(&err, ViewerError::GltfError(msg) if msg.contains("children")), "{err}");
}

#[test]
fn out_of_range_scene_node_is_a_gltf_error() {
    let bytes = serde_json::to_vec(&serde_json::json!({
        "asset": { "version": "2.0" },
        "scenes": [{ "nodes": [3] }],
        "nodes": [{ "name": "A" }]
    }))
    .unwrap();
    let err = load(&AssetLoader::default(), &bytes).unwrap_err();
    assert!(matches!(&err, ViewerError::GltfError(msg) if msg.contains("scenes")), "{err}");
}

#[test]
fn out_of_range_animation_target_is_a_gltf_error() {
    let mut doc = gltf_document(&[]);
    doc["animations"][1]["channels"][0]["target"]["node"] = serde_json::json!(42);
    let bytes = serde_json::to_vec(&doc).unwrap();
    let err = load(&AssetLoader::default(), &bytes).unwrap_err();
    assert!(matches!(err, ViewerError::GltfError(_)));
}

// ============================================================================
// Data URIs and readers
// ============================================================================

#[test]
fn data_uri_decodes_base64() {
    let bytes = decode_data_uri("data:application/octet-stream;base64,AQID").unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);
}

#[test]
fn data_uri_rejects_other_encodings() {
    assert!(matches!(decode_data_uri("data:text/plain,hello"), Err(ViewerError::DataUriError(_))));
    assert!(matches!(decode_data_uri("blob:abc"), Err(ViewerError::DataUriError(_))));
    assert!(matches!(
        decode_data_uri("data:application/octet-stream;base64,!!!"),
        Err(ViewerError::Base64Error(_))
    ));
}

#[test]
fn reader_is_chosen_from_source() {
    assert!(matches!(
        AssetReaderVariant::from_source("models/character.glb").unwrap(),
        AssetReaderVariant::File(_)
    ));
    assert!(matches!(
        AssetReaderVariant::from_source("https://example.com/models/character.glb").unwrap(),
        AssetReaderVariant::Http(_)
    ));
    assert_eq!(AssetReaderVariant::source_filename("models/character.glb"), "character.glb");
    assert_eq!(
        AssetReaderVariant::source_filename("https://example.com/models/character.glb"),
        "character.glb"
    );
}

#[test]
fn file_reader_is_rooted_at_asset_directory() {
    let AssetReaderVariant::File(reader) = AssetReaderVariant::from_source("models/character.glb").unwrap() else {
        panic!("expected a file reader");
    };
    assert_eq!(reader.root_path(), std::path::Path::new("models"));
}

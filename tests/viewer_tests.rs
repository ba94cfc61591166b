//! Viewer Tests
//!
//! Tests for:
//! - Installing a model: placement, callbacks, initial clip
//! - Frame order: head-look override on top of the mixer
//! - Intro sequencing and head-look hand-over
//! - Resize, disposal and background loading from disk

mod common;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use glam::Vec3;

use avatar_viewer::animation::director::IntroConfig;
use avatar_viewer::utils::FrameClock;
use avatar_viewer::viewer::{AvatarViewer, FrameLoop, HeadlessBackend, LoopControl, ViewerConfig, ViewerStatus};

use common::{approx, approx_vec3, gltf_bytes, named_clips, rig_asset, rotation_clip};

const DT: f32 = 1.0 / 60.0;

fn viewer(config: ViewerConfig) -> AvatarViewer<HeadlessBackend> {
    let mut viewer = AvatarViewer::new(config, Some(HeadlessBackend::default()));
    viewer.resize(800, 600, 1.0);
    viewer
}

fn run(viewer: &mut AvatarViewer<HeadlessBackend>, frames: usize) {
    for _ in 0..frames {
        viewer.tick(DT);
    }
}

fn head_facing_error(viewer: &AvatarViewer<HeadlessBackend>) -> f32 {
    let bone = viewer.head_look().bone().unwrap();
    let head = viewer.scene().get_node(bone).unwrap();
    let target = viewer.look_target().unwrap();
    let wanted = (target - head.transform.world_position()).normalize();
    (head.transform.world_rotation() * Vec3::NEG_Z).angle_between(wanted)
}

/// Writes the fixture document to a fresh directory and returns the file path.
fn fixture_on_disk(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("avatar_viewer_{}_{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("character.gltf");
    std::fs::write(&path, gltf_bytes()).unwrap();
    path
}

fn tick_until_settled(viewer: &mut AvatarViewer<HeadlessBackend>) {
    for _ in 0..500 {
        viewer.tick(DT);
        if !viewer.is_loading() {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("load did not finish");
}

// ============================================================================
// Install
// ============================================================================

#[test]
fn install_places_model_and_reports() {
    let mut viewer = viewer(ViewerConfig::default());
    let loaded = Rc::new(RefCell::new(Vec::new()));
    let started = Rc::new(RefCell::new(Vec::new()));
    {
        let loaded = Rc::clone(&loaded);
        let started = Rc::clone(&started);
        viewer
            .on_model_loaded(move |names| loaded.borrow_mut().extend(names.iter().cloned()))
            .on_clip_started(move |name| started.borrow_mut().push(name.to_string()));
    }

    viewer.install_asset(rig_asset(named_clips(&["Idle", "Casual_Walk"])));

    assert_eq!(viewer.status(), &ViewerStatus::Ready);
    assert_eq!(*loaded.borrow(), vec!["Idle".to_string(), "Casual_Walk".to_string()]);
    assert_eq!(*started.borrow(), vec!["Casual_Walk".to_string()]);
    assert_eq!(viewer.clip_names(), ["Idle".to_string(), "Casual_Walk".to_string()]);

    let root = viewer.model_root().unwrap();
    let position = viewer.scene().get_node(root).unwrap().transform.world_position();
    assert!(approx_vec3(position, Vec3::new(1.5, 0.0, 0.0)));

    // Camera stays put and looks back toward the model.
    assert!(approx_vec3(viewer.camera().position(), Vec3::new(1.5, 1.7, 2.5)));
    assert!(viewer.camera().forward().z < -0.5);
}

#[test]
fn head_look_auto_enables_without_intro() {
    let mut viewer = viewer(ViewerConfig::default());
    viewer.install_asset(rig_asset(named_clips(&["Walk"])));
    assert!(viewer.head_look().is_enabled());
    assert!(viewer.head_look().bone().is_some());
}

#[test]
fn head_override_survives_mixer() {
    let mut viewer = viewer(ViewerConfig::default());
    // The clip spins the head about Y; the override must win every frame.
    viewer.install_asset(rig_asset(vec![rotation_clip("Casual_Walk", "Head", 1.0, 2.5)]));

    run(&mut viewer, 120);
    assert!(head_facing_error(&viewer) < 0.05, "error {}", head_facing_error(&viewer));
    assert_eq!(viewer.renderer().unwrap().frames, 120);
}

#[test]
fn missing_head_bone_leaves_animation_alone() {
    let mut config = ViewerConfig::default();
    config.head_look.bone_name = "Jaw".into();
    let mut viewer = viewer(config);
    viewer.install_asset(rig_asset(vec![rotation_clip("Casual_Walk", "Head", 1.0, 1.0)]));
    assert!(viewer.head_look().bone().is_none());

    run(&mut viewer, 30);
    // 30 frames = 0.5 s into a linear 0 → 1 rad turn.
    let root = viewer.model_root().unwrap();
    let head = viewer.scene().find_node_by_name(root, "Head").unwrap();
    let rotation = viewer.scene().get_node(head).unwrap().transform.rotation;
    let (axis, angle) = rotation.to_axis_angle();
    assert!((angle - 0.5).abs() < 0.02, "angle {angle}");
    assert!(approx_vec3(axis, Vec3::Y));
}

#[test]
fn play_animation_reports_clip() {
    let mut viewer = viewer(ViewerConfig::default());
    let started = Rc::new(RefCell::new(Vec::new()));
    {
        let started = Rc::clone(&started);
        viewer.on_clip_started(move |name| started.borrow_mut().push(name.to_string()));
    }
    viewer.install_asset(rig_asset(named_clips(&["Walk", "Dance01"])));

    assert!(viewer.play_animation("dance01"));
    assert!(!viewer.play_animation("backflip"));
    assert_eq!(*started.borrow(), vec!["Walk".to_string(), "Dance01".to_string()]);
}

// ============================================================================
// Intro
// ============================================================================

#[test]
fn intro_completion_enables_head_look() {
    let mut config = ViewerConfig::default();
    config.animation.intro = Some(IntroConfig::default());
    let mut viewer = viewer(config);
    viewer.install_asset(rig_asset(named_clips(&["Intro", "Loop"])));

    assert!(viewer.director().is_intro_playing());
    assert!(!viewer.head_look().is_enabled());

    for _ in 0..4 {
        viewer.tick(0.25);
    }
    assert!(viewer.head_look().is_enabled());
    assert_eq!(viewer.director().current_clip_name(), Some("Loop"));
}

#[test]
fn replaying_intro_pauses_head_look() {
    let mut config = ViewerConfig::default();
    config.animation.intro = Some(IntroConfig::default());
    let mut viewer = viewer(config);
    viewer.install_asset(rig_asset(named_clips(&["Intro", "Loop"])));
    for _ in 0..6 {
        viewer.tick(0.25);
    }
    assert!(viewer.head_look().is_enabled());

    assert!(viewer.start_intro_sequence());
    assert!(!viewer.head_look().is_enabled());
}

#[test]
fn replaying_intro_returns_head_to_skeletal_pose() {
    let mut config = ViewerConfig::default();
    config.animation.intro = Some(IntroConfig::default());
    let mut viewer = viewer(config);
    viewer.install_asset(rig_asset(named_clips(&["Intro", "Loop"])));
    let bone = viewer.head_look().bone().unwrap();
    let bind = viewer.scene().get_node(bone).unwrap().transform.rotation;

    viewer.set_pointer(780.0, 20.0);
    run(&mut viewer, 200);
    let tracked = viewer.scene().get_node(bone).unwrap().transform.rotation;
    assert!(tracked.angle_between(bind) > 0.1);

    assert!(viewer.start_intro_sequence());
    run(&mut viewer, 30);
    assert!(viewer.director().is_intro_playing());
    let head = viewer.scene().get_node(bone).unwrap();
    assert!(head.transform.rotation.angle_between(bind) < 1e-3);
}

// ============================================================================
// Host surface
// ============================================================================

#[test]
fn resize_caps_pixel_ratio() {
    let mut viewer = viewer(ViewerConfig::default());
    viewer.resize(1200, 600, 3.0);

    let backend = viewer.renderer().unwrap();
    assert_eq!(backend.size, (1200, 600));
    assert!(approx(backend.pixel_ratio, 2.0));
    assert!(approx(viewer.camera().aspect, 2.0));
}

#[test]
fn frame_loop_drives_viewer() {
    let mut viewer = viewer(ViewerConfig::default());
    let mut frames = FrameLoop::new();
    assert_eq!(frames.tick(&mut viewer), LoopControl::Continue);
    assert_eq!(frames.tick(&mut viewer), LoopControl::Continue);
    assert_eq!(viewer.frame_count(), 2);
    assert_eq!(frames.clock().frames(), 2);
}

#[test]
fn frame_clock_starts_at_zero_and_caps_stalls() {
    let mut clock = FrameClock::with_max_delta(Duration::from_millis(100));
    let start = Instant::now();
    assert!(approx(clock.sample_at(start), 0.0));
    assert!(approx(clock.sample_at(start + Duration::from_millis(16)), 0.016));
    assert!(approx(clock.sample_at(start + Duration::from_secs(5)), 0.1));
    assert_eq!(clock.frames(), 3);
}

#[test]
fn dispose_stops_everything() {
    let mut viewer = viewer(ViewerConfig::default());
    viewer.install_asset(rig_asset(named_clips(&["Walk"])));
    viewer.dispose();

    assert!(!viewer.is_alive());
    assert!(viewer.renderer().unwrap().disposed);
    assert!(viewer.model_root().is_none());
    assert!(viewer.director().mixer().is_none());
    assert_eq!(viewer.tick(DT), LoopControl::Stop);

    // Late arrivals are dropped.
    viewer.install_asset(rig_asset(named_clips(&["Walk"])));
    assert!(viewer.model_root().is_none());
    viewer.load_model();
    assert!(!viewer.is_loading());
}

#[test]
fn config_fills_missing_fields_with_defaults() {
    let config = ViewerConfig::from_json(
        r#"{ "model_position": [0.0, 0.0, 0.0], "animation": { "transition_duration": 0.25 } }"#,
    )
    .unwrap();
    assert!(approx_vec3(config.model_position, Vec3::ZERO));
    assert!(approx(config.animation.transition_duration, 0.25));
    assert_eq!(config.animation.initial_clip, ViewerConfig::default().animation.initial_clip);
    assert!(approx(config.camera.fov, 50.0));
    assert_eq!(config.head_look.bone_name, "Head");
}

// ============================================================================
// Background loading
// ============================================================================

#[test]
fn loads_model_from_disk() {
    let path = fixture_on_disk("load");
    let mut viewer = viewer(ViewerConfig::default());
    let starts = Rc::new(RefCell::new(0));
    let progress = Rc::new(RefCell::new(0));
    {
        let starts = Rc::clone(&starts);
        let progress = Rc::clone(&progress);
        viewer
            .on_model_load_start(move || *starts.borrow_mut() += 1)
            .on_model_load_progress(move |_, _| *progress.borrow_mut() += 1);
    }

    viewer.load_model_from(path.to_string_lossy());
    // Second request while in flight is ignored.
    viewer.load_model_from(path.to_string_lossy());
    assert_eq!(viewer.status(), &ViewerStatus::Loading);

    tick_until_settled(&mut viewer);

    assert_eq!(viewer.status(), &ViewerStatus::Ready);
    assert_eq!(*starts.borrow(), 1);
    assert!(*progress.borrow() >= 1);
    assert_eq!(viewer.clip_names(), ["Casual_Walk".to_string(), "Wave".to_string()]);
    assert_eq!(viewer.director().current_clip_name(), Some("Casual_Walk"));
    assert!(viewer.head_look().bone().is_some());

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn missing_file_fails_load() {
    let mut viewer = viewer(ViewerConfig::default());
    let errors = Rc::new(RefCell::new(Vec::new()));
    {
        let errors = Rc::clone(&errors);
        viewer.on_model_load_error(move |message| errors.borrow_mut().push(message.to_string()));
    }

    let path = std::env::temp_dir().join("avatar_viewer_missing").join("nope.glb");
    viewer.load_model_from(path.to_string_lossy());
    tick_until_settled(&mut viewer);

    assert!(matches!(viewer.status(), ViewerStatus::Failed { .. }));
    assert_eq!(errors.borrow().len(), 1);
    assert!(errors.borrow()[0].contains("Asset not found"));
    assert!(viewer.model_root().is_none());

    // The viewer keeps ticking without a model.
    assert_eq!(viewer.tick(DT), LoopControl::Continue);
}

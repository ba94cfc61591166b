use std::time::Duration;

use avatar_viewer::viewer::{AvatarViewer, FrameLoop, HeadlessBackend, LoopControl, ViewerConfig, ViewerStatus};

/// Headless viewer demo
///
/// Loads a model from the path given on the command line (or the configured
/// default), plays the initial clip for a few seconds while sweeping the
/// pointer across the viewport, then switches clip and shuts down.
///
/// `cargo run --example headless_viewer -- path/to/character.glb`
fn main() -> avatar_viewer::Result<()> {
    env_logger::init();

    let mut config = ViewerConfig::default();
    if let Some(path) = std::env::args().nth(1) {
        config.model_source = path;
    }

    let mut viewer = AvatarViewer::new(config, Some(HeadlessBackend::default()));
    viewer.resize(1280, 720, 2.0);
    viewer
        .on_model_load_progress(|loaded, total| match total {
            Some(total) => println!("Loading: {loaded}/{total} bytes"),
            None => println!("Loading: {loaded} bytes"),
        })
        .on_model_loaded(|clips| println!("Model ready, animations: {clips:?}"))
        .on_model_load_error(|message| eprintln!("Could not load model: {message}"))
        .on_clip_started(|name| println!("Now playing '{name}'"));
    viewer.load_model();

    let mut frames = FrameLoop::new();
    let mut ready_at = None;
    let mut switched = false;
    while frames.tick(&mut viewer) == LoopControl::Continue {
        std::thread::sleep(Duration::from_millis(16));

        match viewer.status() {
            ViewerStatus::Loading | ViewerStatus::Idle => continue,
            ViewerStatus::Failed { .. } => break,
            ViewerStatus::Ready => {}
        }

        let t = viewer.time() - *ready_at.get_or_insert(viewer.time());
        viewer.set_pointer(640.0 + 600.0 * t.sin(), 360.0);

        if t > 3.0 && !switched {
            switched = true;
            if !viewer.play_animation("idle") {
                println!("No idle clip; staying on the current one");
            }
        }
        if t > 6.0 {
            if let Some(target) = viewer.look_target() {
                println!("Head looking at {target:?}");
            }
            viewer.dispose();
        }
    }

    if let Some(backend) = viewer.renderer() {
        println!("Rendered {} frames", backend.frames);
    }
    Ok(())
}

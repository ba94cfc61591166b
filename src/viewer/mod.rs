//! Viewer Module
//!
//! This module contains [`AvatarViewer`], the single owner of everything a
//! displayed character needs: scene graph, camera, render backend, animation
//! director, head-look controller and the in-flight load.
//!
//! # Frame order
//!
//! [`AvatarViewer::tick`] runs, in this order:
//!
//! 1. Poll the pending load and install or fail
//! 2. Recompute the head-look target from the pointer
//! 3. Step the director (mixer) and refresh world matrices
//! 4. Apply the head-look override on top of the animated pose
//! 5. Render
//!
//! Steps 3 and 4 must not be swapped: the mixer rewrites every bound bone each
//! step and would erase the override.
//!
//! # Example
//!
//! ```rust,ignore
//! use avatar_viewer::viewer::{AvatarViewer, FrameLoop, HeadlessBackend, LoopControl, ViewerConfig};
//!
//! let mut viewer = AvatarViewer::new(ViewerConfig::default(), Some(HeadlessBackend::default()));
//! viewer.resize(1280, 720, 1.0);
//! viewer.load_model();
//!
//! let mut frames = FrameLoop::new();
//! while frames.tick(&mut viewer) == LoopControl::Continue {
//!     // wait for the next display refresh
//! }
//! ```

pub mod backend;
pub mod config;
pub mod frame_loop;

pub use backend::{HeadlessBackend, RenderBackend};
pub use config::{CameraConfig, StageConfig, ViewerConfig};
pub use frame_loop::{FrameLoop, LoopControl};

use glam::{Vec2, Vec3};

use crate::animation::{AnimationDirector, DirectorEvent};
use crate::assets::{AssetLoader, LoadMessage, MeshCompression, SceneAsset};
use crate::errors::ViewerError;
use crate::head_look::{HeadLookController, pointer_to_ndc};
use crate::scene::{Camera, NodeHandle, Scene};

/// Load lifecycle as seen by the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerStatus {
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

pub type LoadStartFn = Box<dyn FnMut()>;
pub type LoadProgressFn = Box<dyn FnMut(u64, Option<u64>)>;
pub type LoadedFn = Box<dyn FnMut(&[String])>;
pub type LoadErrorFn = Box<dyn FnMut(&str)>;
pub type ClipStartedFn = Box<dyn FnMut(&str)>;

/// Host callbacks. All are optional and run on the ticking thread.
#[derive(Default)]
struct ViewerEvents {
    on_model_load_start: Option<LoadStartFn>,
    on_model_load_progress: Option<LoadProgressFn>,
    on_model_loaded: Option<LoadedFn>,
    on_model_load_error: Option<LoadErrorFn>,
    on_clip_started: Option<ClipStartedFn>,
}

/// The installed model.
struct Model {
    root: NodeHandle,
    clip_names: Vec<String>,
    compression: Option<MeshCompression>,
}

pub struct AvatarViewer<R: RenderBackend> {
    config: ViewerConfig,
    renderer: Option<R>,
    loader: AssetLoader,

    scene: Scene,
    camera: Camera,
    model: Option<Model>,

    director: AnimationDirector,
    head_look: HeadLookController,

    pending: Option<flume::Receiver<LoadMessage>>,
    status: ViewerStatus,
    events: ViewerEvents,

    pointer: Option<Vec2>,
    viewport: Vec2,

    alive: bool,
    time: f32,
    frame_count: u64,
}

impl<R: RenderBackend> AvatarViewer<R> {
    /// Creates a viewer. The renderer, if any, is prepared with the stage
    /// description right away.
    ///
    /// Passing `None` gives a viewer that animates without drawing.
    #[must_use]
    pub fn new(config: ViewerConfig, renderer: Option<R>) -> Self {
        let mut camera = Camera::new_perspective(config.camera.fov, 1.0, config.camera.near, config.camera.far);
        camera.transform.position = config.camera.position;
        camera.update_matrix_world();

        let mut renderer = renderer;
        if let Some(r) = renderer.as_mut() {
            r.prepare(&config.stage);
        }

        Self {
            loader: AssetLoader::new(config.loader.clone()),
            director: AnimationDirector::new(config.animation.clone()),
            head_look: HeadLookController::new(config.head_look.clone()),
            config,
            renderer,
            scene: Scene::new(),
            camera,
            model: None,
            pending: None,
            status: ViewerStatus::Idle,
            events: ViewerEvents::default(),
            pointer: None,
            viewport: Vec2::ZERO,
            alive: true,
            time: 0.0,
            frame_count: 0,
        }
    }

    // ========================================================================
    // Callbacks
    // ========================================================================

    pub fn on_model_load_start<F: FnMut() + 'static>(&mut self, f: F) -> &mut Self {
        self.events.on_model_load_start = Some(Box::new(f));
        self
    }

    pub fn on_model_load_progress<F: FnMut(u64, Option<u64>) + 'static>(&mut self, f: F) -> &mut Self {
        self.events.on_model_load_progress = Some(Box::new(f));
        self
    }

    /// Receives the clip names of the installed model.
    pub fn on_model_loaded<F: FnMut(&[String]) + 'static>(&mut self, f: F) -> &mut Self {
        self.events.on_model_loaded = Some(Box::new(f));
        self
    }

    pub fn on_model_load_error<F: FnMut(&str) + 'static>(&mut self, f: F) -> &mut Self {
        self.events.on_model_load_error = Some(Box::new(f));
        self
    }

    pub fn on_clip_started<F: FnMut(&str) + 'static>(&mut self, f: F) -> &mut Self {
        self.events.on_clip_started = Some(Box::new(f));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> &ViewerStatus {
        &self.status
    }

    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    #[must_use]
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn director(&self) -> &AnimationDirector {
        &self.director
    }

    #[inline]
    #[must_use]
    pub fn head_look(&self) -> &HeadLookController {
        &self.head_look
    }

    #[must_use]
    pub fn model_root(&self) -> Option<NodeHandle> {
        self.model.as_ref().map(|m| m.root)
    }

    #[must_use]
    pub fn clip_names(&self) -> &[String] {
        self.model.as_ref().map_or(&[][..], |m| m.clip_names.as_slice())
    }

    #[must_use]
    pub fn compression(&self) -> Option<&MeshCompression> {
        self.model.as_ref().and_then(|m| m.compression.as_ref())
    }

    /// Seconds of animation time stepped so far.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Starts loading the configured model.
    pub fn load_model(&mut self) {
        let source = self.config.model_source.clone();
        self.load_model_from(source);
    }

    /// Starts loading `source` in the background. Ignored while another load
    /// is in flight or after disposal.
    pub fn load_model_from(&mut self, source: impl Into<String>) {
        if !self.alive {
            log::debug!("load_model on a disposed viewer ignored");
            return;
        }
        if self.pending.is_some() {
            log::debug!("A model load is already in flight");
            return;
        }

        let (sender, receiver) = flume::unbounded();
        self.loader.spawn(source, sender);
        self.pending = Some(receiver);
        self.status = ViewerStatus::Loading;

        if let Some(f) = self.events.on_model_load_start.as_mut() {
            f();
        }
    }

    /// Drains the pending load channel.
    fn poll_load(&mut self) {
        let Some(receiver) = self.pending.as_ref() else {
            return;
        };

        let disconnected = receiver.is_disconnected();
        let messages: Vec<LoadMessage> = receiver.try_iter().collect();

        for message in messages {
            match message {
                LoadMessage::Progress { loaded, total } => {
                    if let Some(total) = total.filter(|&t| t > 0) {
                        log::debug!("Loading model: {:.0}%", loaded as f64 / total as f64 * 100.0);
                    }
                    if let Some(f) = self.events.on_model_load_progress.as_mut() {
                        f(loaded, total);
                    }
                }
                LoadMessage::Finished(result) => {
                    self.pending = None;
                    match result {
                        Ok(asset) => self.install_asset(asset),
                        Err(e) => self.fail_load(&e),
                    }
                    return;
                }
            }
        }

        if disconnected {
            self.pending = None;
            self.fail_load(&ViewerError::LoadAborted);
        }
    }

    fn fail_load(&mut self, error: &ViewerError) {
        let message = error.to_string();
        log::error!("Error loading model: {message}");
        self.status = ViewerStatus::Failed { message: message.clone() };
        if let Some(f) = self.events.on_model_load_error.as_mut() {
            f(&message);
        }
    }

    /// Replaces the current model with `asset` and starts its animations.
    ///
    /// Called by the frame loop when a background load completes; also usable
    /// directly with an asset decoded elsewhere. No-op after disposal.
    pub fn install_asset(&mut self, asset: SceneAsset) {
        if !self.alive {
            log::debug!("Model arrived after disposal; dropped");
            return;
        }

        self.director.detach();
        self.head_look.reset();

        let SceneAsset {
            scene,
            root,
            clips,
            compression,
            ..
        } = asset;
        self.scene = scene;

        if let Some(node) = self.scene.get_node_mut(root) {
            node.transform.position = self.config.model_position;
        }
        self.scene.update_matrix_world();
        self.aim_camera_at(root);

        if let Some(c) = &compression {
            log::info!("Meshes use {} (decoder at '{}')", c.extension, c.decoder_path);
        }

        let clip_names: Vec<String> = clips.iter().map(|c| c.name.clone()).collect();
        self.director.attach(&self.scene, root, clips);

        self.head_look.resolve_bone(&self.scene, root);
        if self.config.head_look.auto_enable && self.director.config().intro.is_none() {
            self.head_look.set_enabled(true);
        }

        self.model = Some(Model {
            root,
            clip_names,
            compression,
        });
        self.status = ViewerStatus::Ready;
        log::info!("Model loaded successfully");

        if let Some(f) = self.events.on_model_loaded.as_mut() {
            let names = self.model.as_ref().map_or(&[][..], |m| m.clip_names.as_slice());
            f(names);
        }

        let events = self.director.take_events();
        self.dispatch(events);
    }

    fn aim_camera_at(&mut self, root: NodeHandle) {
        let Some((min, max)) = self.scene.world_bounds(root) else {
            return;
        };
        let center = (min + max) * 0.5 + self.config.look_offset;
        if center.distance_squared(self.camera.position()) > f32::EPSILON {
            self.camera.look_at(center);
        }
    }

    // ========================================================================
    // Host input
    // ========================================================================

    /// Updates the viewport and camera aspect. `device_pixel_ratio` is capped
    /// by [`ViewerConfig::max_pixel_ratio`].
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        if !self.alive {
            return;
        }
        self.viewport = Vec2::new(width as f32, height as f32);
        if width > 0 && height > 0 {
            self.camera.set_aspect(width as f32 / height as f32);
        }
        let pixel_ratio = device_pixel_ratio.min(self.config.max_pixel_ratio);
        if let Some(r) = self.renderer.as_mut() {
            r.resize(width, height, pixel_ratio);
        }
    }

    /// Pointer position in screen pixels, origin top-left.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Some(Vec2::new(x, y));
    }

    /// Pointer left the page; head-look aims at the screen centre.
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Crossfades to the clip matching `name` using the configured duration.
    pub fn play_animation(&mut self, name: &str) -> bool {
        let duration = self.config.animation.transition_duration;
        self.play_animation_with(name, duration)
    }

    pub fn play_animation_with(&mut self, name: &str, duration: f32) -> bool {
        let started = self.director.play_animation(&self.scene, name, duration);
        let events = self.director.take_events();
        self.dispatch(events);
        started
    }

    /// Replays the intro → loop sequence, e.g. after a consent banner closes.
    /// Head-look pauses until the intro completes and the head goes back to
    /// its animated rotation on the next tick.
    pub fn start_intro_sequence(&mut self) -> bool {
        let started = self.director.start_intro_sequence(&self.scene);
        if started {
            self.head_look.set_enabled(false);
        }
        let events = self.director.take_events();
        self.dispatch(events);
        started
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Runs one frame with `dt` seconds of elapsed time.
    pub fn tick(&mut self, dt: f32) -> LoopControl {
        if !self.alive {
            return LoopControl::Stop;
        }

        self.poll_load();
        self.time += dt;
        self.frame_count += 1;

        let ndc = self
            .pointer
            .and_then(|p| pointer_to_ndc(p, self.viewport))
            .unwrap_or(Vec2::ZERO);
        self.head_look.update_target(&self.camera, ndc);

        let events = self.director.update(dt, &mut self.scene);
        self.scene.update_matrix_world();
        self.dispatch(events);

        if self.head_look.apply(&mut self.scene)
            && let Some(bone) = self.head_look.bone()
        {
            self.scene.update_subtree(bone);
        }

        if let Some(r) = self.renderer.as_mut() {
            r.render(&self.scene, &self.camera);
        }

        LoopControl::Continue
    }

    fn dispatch(&mut self, events: Vec<DirectorEvent>) {
        for event in events {
            match event {
                DirectorEvent::ClipStarted(name) => {
                    if let Some(f) = self.events.on_clip_started.as_mut() {
                        f(&name);
                    }
                }
                DirectorEvent::IntroCompleted => {
                    log::info!("Intro completed, head tracking enabled");
                    self.head_look.set_enabled(true);
                }
            }
        }
    }

    /// Stops animation, drops the model and any pending load, and releases
    /// the renderer. Later ticks return [`LoopControl::Stop`].
    pub fn dispose(&mut self) {
        if !self.alive {
            return;
        }

        self.director.detach();
        self.head_look.reset();
        self.model = None;
        self.scene = Scene::new();
        self.pending = None;

        if let Some(r) = self.renderer.as_mut() {
            r.dispose();
        }

        self.alive = false;
        log::debug!("Viewer disposed after {} frames", self.frame_count);
    }

    /// Pointer in world space, for debug overlays.
    #[must_use]
    pub fn look_target(&self) -> Option<Vec3> {
        self.head_look.smoothed_target()
    }
}

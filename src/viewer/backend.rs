use crate::scene::{Camera, Scene};
use crate::viewer::config::StageConfig;

/// The drawing side of the viewer.
///
/// The viewer only hands over pure data: the scene graph with its
/// [`MeshFlags`](crate::scene::MeshFlags), the camera, and the stage
/// description. GPU resources are the implementor's business.
pub trait RenderBackend {
    /// Called once, before the first frame.
    fn prepare(&mut self, _stage: &StageConfig) {}

    /// `pixel_ratio` is already capped by the viewer config.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32);

    fn render(&mut self, scene: &Scene, camera: &Camera);

    /// Releases GPU resources. No call follows.
    fn dispose(&mut self) {}
}

/// A backend that draws nothing and counts frames.
#[derive(Debug, Default, Clone)]
pub struct HeadlessBackend {
    pub frames: u64,
    pub size: (u32, u32),
    pub pixel_ratio: f32,
    pub disposed: bool,
}

impl RenderBackend for HeadlessBackend {
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.size = (width, height);
        self.pixel_ratio = pixel_ratio;
    }

    fn render(&mut self, _scene: &Scene, _camera: &Camera) {
        self.frames += 1;
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}

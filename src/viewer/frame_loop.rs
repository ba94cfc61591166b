use crate::utils::FrameClock;
use crate::viewer::AvatarViewer;
use crate::viewer::backend::RenderBackend;

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Schedule the next frame.
    Continue,
    /// The viewer was disposed; stop rescheduling.
    Stop,
}

/// Drives an [`AvatarViewer`] from the host's per-refresh callback.
///
/// The loop only measures time; the ordered per-frame work lives in
/// [`AvatarViewer::tick`].
#[derive(Default)]
pub struct FrameLoop {
    clock: FrameClock,
}

impl FrameLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Samples the clock and runs one frame.
    pub fn tick<R: RenderBackend>(&mut self, viewer: &mut AvatarViewer<R>) -> LoopControl {
        let dt = self.clock.sample();
        viewer.tick(dt)
    }
}

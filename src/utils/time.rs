#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Longest step handed to the animation after a stall, e.g. a hidden tab.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

/// Per-frame delta source for the frame loop.
///
/// The first sample measures zero; later samples are capped at
/// `max_delta` so a stalled host does not skip whole crossfades.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: Duration,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA)
    }
}

impl FrameClock {
    #[must_use]
    pub fn with_max_delta(max_delta: Duration) -> Self {
        Self {
            last: None,
            max_delta,
            frames: 0,
        }
    }

    /// Seconds since the previous sample.
    pub fn sample(&mut self) -> f32 {
        self.sample_at(Instant::now())
    }

    /// [`sample`](Self::sample) against a given instant.
    pub fn sample_at(&mut self, now: Instant) -> f32 {
        let delta = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last))
            .min(self.max_delta);
        self.last = Some(now);
        self.frames += 1;
        delta.as_secs_f32()
    }

    #[inline]
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

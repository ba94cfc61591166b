use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play to the end once, then finish.
    Once,
    /// Wrap around at the end.
    Repeat,
}

/// A scheduled linear ramp of the action's weight multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WeightFade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl WeightFade {
    fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// A stateful playback instance of one clip.
///
/// Effective blend weight is `weight` times the current fade multiplier.
/// Fades advance on mixer time even while the action is paused, so a clamped
/// one-shot can still be faded out.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    /// With [`LoopMode::Once`], hold the final pose instead of disabling.
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    running: bool,
    finished: bool,
    fade: Option<WeightFade>,
    fade_weight: f32,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Repeat,
            clamp_when_finished: false,
            paused: false,
            enabled: true,
            running: false,
            finished: false,
            fade: None,
            fade_weight: 1.0,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Schedules the action for playback.
    pub fn play(&mut self) -> &mut Self {
        self.running = true;
        self.enabled = true;
        self
    }

    /// Stops playback and rewinds.
    pub fn stop(&mut self) -> &mut Self {
        self.running = false;
        self.reset()
    }

    /// Rewinds to the start and clears paused, finished and fade state.
    pub fn reset(&mut self) -> &mut Self {
        self.paused = false;
        self.enabled = true;
        self.time = 0.0;
        self.finished = false;
        self.fade = None;
        self.fade_weight = 1.0;
        for cursor in &mut self.track_cursors {
            *cursor = KeyframeCursor::default();
        }
        self
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    /// Ramps the weight multiplier from 0 to 1 over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.schedule_fade(0.0, 1.0, duration)
    }

    /// Ramps the weight multiplier from its current value to 0 over `duration`
    /// seconds, then disables the action.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        let from = self.fade_weight;
        self.schedule_fade(from, 0.0, duration)
    }

    fn schedule_fade(&mut self, from: f32, to: f32, duration: f32) -> &mut Self {
        self.fade = Some(WeightFade {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        });
        self.fade_weight = from;
        self
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running && self.enabled
    }

    /// True once a [`LoopMode::Once`] action has reached its end.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Weight this action contributes to the blend this frame.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.is_running() {
            self.weight * self.fade_weight
        } else {
            0.0
        }
    }

    /// Advances fades and local time by `dt` seconds.
    ///
    /// Returns `true` on the frame a one-shot action finishes.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.is_running() {
            return false;
        }

        self.update_fade(dt);
        if !self.is_running() || self.paused {
            return false;
        }

        let duration = self.clip.duration;
        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                let at_end = self.time >= duration;
                let at_start = self.time < 0.0;
                if !(at_end || at_start) {
                    return false;
                }
                self.time = if at_end { duration } else { 0.0 };
                self.finished = true;
                if self.clamp_when_finished {
                    self.paused = true;
                } else {
                    self.enabled = false;
                }
                true
            }
            LoopMode::Repeat => {
                if duration > 0.0 {
                    self.time = self.time.rem_euclid(duration);
                } else {
                    self.time = 0.0;
                }
                false
            }
        }
    }

    fn update_fade(&mut self, dt: f32) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };

        fade.elapsed += dt;
        self.fade_weight = fade.value();

        if fade.is_done() {
            let to = fade.to;
            self.fade = None;
            if to <= 0.0 {
                self.running = false;
                self.enabled = false;
            }
        }
    }

    /// Samples track `track_index` at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Quaternion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}

//! Current-action state machine.
//!
//! [`AnimationDirector`] decides which clip is playing: the initial clip after
//! a load, the optional intro → loop sequence, and user-driven transitions via
//! [`play_animation`](AnimationDirector::play_animation). Every lookup has a
//! fallback, so a missing clip degrades to "keep playing what we have" rather
//! than an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::animation::action::LoopMode;
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::{ActionHandle, AnimationMixer};
use crate::animation::resolve::{ClipLookup, resolve_clip, transition_chain};
use crate::scene::{NodeHandle, Scene};

/// Scripted one-shot intro followed by a looping clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub intro: String,
    pub loop_clip: String,
    /// Seconds the intro fades out while the loop fades in.
    pub crossfade: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            intro: "intro".to_string(),
            loop_clip: "loop".to_string(),
            crossfade: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Resolution chain for the clip started right after a load.
    pub initial_clip: Vec<ClipLookup>,
    /// When set, a load starts the intro sequence instead of `initial_clip`.
    pub intro: Option<IntroConfig>,
    /// Default crossfade for user-driven transitions, in seconds.
    pub transition_duration: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            initial_clip: vec![
                ClipLookup::ExactIgnoreCase("Casual_Walk".to_string()),
                ClipLookup::Fuzzy("walk".to_string()),
                ClipLookup::Index(0),
                ClipLookup::First,
            ],
            intro: None,
            transition_duration: 0.5,
        }
    }
}

/// Things the director reports back to its owner after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorEvent {
    /// A clip became the current action.
    ClipStarted(String),
    /// The intro handed over to the loop clip; head tracking may start.
    IntroCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sequence {
    Idle,
    Intro { intro: ActionHandle, looping: ActionHandle },
}

pub struct AnimationDirector {
    config: AnimationConfig,
    mixer: Option<AnimationMixer>,
    clips: Vec<Arc<AnimationClip>>,
    current: Option<ActionHandle>,
    sequence: Sequence,
    events: Vec<DirectorEvent>,
}

impl AnimationDirector {
    #[must_use]
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            mixer: None,
            clips: Vec::new(),
            current: None,
            sequence: Sequence::Idle,
            events: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn clips(&self) -> &[Arc<AnimationClip>] {
        &self.clips
    }

    /// The action the viewer considers current.
    #[inline]
    #[must_use]
    pub fn current_action(&self) -> Option<ActionHandle> {
        self.current
    }

    #[must_use]
    pub fn current_clip_name(&self) -> Option<&str> {
        let action = self.mixer.as_ref()?.action(self.current?)?;
        Some(action.clip().name.as_str())
    }

    #[must_use]
    pub fn is_intro_playing(&self) -> bool {
        matches!(self.sequence, Sequence::Intro { intro, .. } if self.current == Some(intro))
    }

    /// Takes ownership of a freshly loaded clip set and starts playback.
    pub fn attach(&mut self, scene: &Scene, root: NodeHandle, clips: Vec<Arc<AnimationClip>>) {
        self.detach();

        if clips.is_empty() {
            log::warn!("No animations found in model");
            return;
        }

        self.clips = clips;
        self.mixer = Some(AnimationMixer::new(root));

        if self.config.intro.is_some() {
            self.start_intro_sequence(scene);
            return;
        }

        match resolve_clip(&self.clips, &self.config.initial_clip) {
            Some(index) => {
                self.start_clip(scene, index, None);
            }
            None => log::warn!(
                "No initial animation resolved. Available animations: {:?}",
                self.clip_names()
            ),
        }
    }

    /// Stops everything and forgets the clip set.
    pub fn detach(&mut self) {
        if let Some(mixer) = self.mixer.as_mut() {
            mixer.stop_all_action();
        }
        self.mixer = None;
        self.clips.clear();
        self.current = None;
        self.sequence = Sequence::Idle;
        self.events.clear();
    }

    /// Plays the configured intro once, then hands over to the loop clip.
    ///
    /// Returns `false` when no intro is configured or one of its clips is
    /// missing; in the latter case the first clip is played on repeat.
    pub fn start_intro_sequence(&mut self, scene: &Scene) -> bool {
        let Some(intro_cfg) = self.config.intro.clone() else {
            log::debug!("No intro sequence configured");
            return false;
        };
        if self.mixer.is_none() || self.clips.is_empty() {
            log::debug!("Intro sequence requested before clips were loaded");
            return false;
        }

        let lookup = |name: &str| {
            resolve_clip(
                &self.clips,
                &[ClipLookup::ExactIgnoreCase(name.to_string()), ClipLookup::Fuzzy(name.to_string())],
            )
        };
        let (Some(intro_index), Some(loop_index)) = (lookup(&intro_cfg.intro), lookup(&intro_cfg.loop_clip)) else {
            log::warn!(
                "Intro sequence expects clips '{}' and '{}'. Available animations: {:?}",
                intro_cfg.intro,
                intro_cfg.loop_clip,
                self.clip_names()
            );
            self.start_clip(scene, 0, Some(intro_cfg.crossfade));
            return false;
        };

        let Some(mixer) = self.mixer.as_mut() else {
            return false;
        };
        let intro = mixer.clip_action(&self.clips[intro_index], scene);
        let looping = mixer.clip_action(&self.clips[loop_index], scene);

        if let Some(previous) = self.current
            && previous != intro
            && let Some(action) = mixer.action_mut(previous)
        {
            action.fade_out(intro_cfg.crossfade);
        }

        if let Some(action) = mixer.action_mut(intro) {
            action.reset().set_loop(LoopMode::Once).play();
            action.clamp_when_finished = true;
            if self.current.is_some_and(|c| c != intro) {
                action.fade_in(intro_cfg.crossfade);
            }
        }

        self.current = Some(intro);
        self.sequence = Sequence::Intro { intro, looping };
        log::info!("Intro '{}' started", self.clips[intro_index].name);
        self.events.push(DirectorEvent::ClipStarted(self.clips[intro_index].name.clone()));
        true
    }

    /// Crossfades to the clip matching `name` over `duration` seconds.
    ///
    /// Matches by exact name first, then by case-insensitive substring with
    /// underscores read as spaces. Returns `false` (and changes nothing) when
    /// no clip matches.
    pub fn play_animation(&mut self, scene: &Scene, name: &str, duration: f32) -> bool {
        if self.mixer.is_none() {
            log::debug!("play_animation('{name}') before a model was loaded");
            return false;
        }

        let Some(index) = resolve_clip(&self.clips, &transition_chain(name)) else {
            log::debug!("No animation matches '{name}'. Available animations: {:?}", self.clip_names());
            return false;
        };

        if let Sequence::Intro { .. } = self.sequence {
            log::debug!("Intro sequence pre-empted by '{name}'");
            self.sequence = Sequence::Idle;
        }

        self.start_clip(scene, index, Some(duration)).is_some()
    }

    /// Advances the mixer, then resolves a finished intro into the loop clip.
    ///
    /// Must run before any procedural override of the pose.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) -> Vec<DirectorEvent> {
        let finished = match self.mixer.as_mut() {
            Some(mixer) => mixer.update(dt, scene),
            None => Vec::new(),
        };
        self.advance_sequence(&finished);
        self.take_events()
    }

    /// Drains events raised outside [`update`](Self::update), e.g. by
    /// [`attach`](Self::attach) or [`play_animation`](Self::play_animation).
    pub fn take_events(&mut self) -> Vec<DirectorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hands a finished intro over to the loop. `finished` holds the actions
    /// that completed during the last mixer step.
    fn advance_sequence(&mut self, finished: &[ActionHandle]) {
        let Sequence::Intro { intro, looping } = self.sequence else {
            return;
        };
        if !finished.contains(&intro) {
            return;
        }
        let Some(mixer) = self.mixer.as_mut() else {
            return;
        };

        self.sequence = Sequence::Idle;
        if self.current != Some(intro) {
            log::debug!("Intro finished after being pre-empted; loop not started");
            return;
        }

        let crossfade = self.config.intro.as_ref().map_or(0.5, |c| c.crossfade);
        let loop_name = match mixer.action_mut(looping) {
            Some(action) => {
                action.reset().set_loop(LoopMode::Repeat).play();
                action.clip().name.clone()
            }
            None => return,
        };
        mixer.cross_fade(intro, looping, crossfade);

        self.current = Some(looping);
        log::info!("Intro finished, looping '{loop_name}'");
        self.events.push(DirectorEvent::ClipStarted(loop_name));
        self.events.push(DirectorEvent::IntroCompleted);
    }

    /// Makes clip `index` current on repeat, crossfading from the previous
    /// current action when `fade` is given.
    fn start_clip(&mut self, scene: &Scene, index: usize, fade: Option<f32>) -> Option<ActionHandle> {
        let clip = Arc::clone(self.clips.get(index)?);
        let mixer = self.mixer.as_mut()?;
        let handle = mixer.clip_action(&clip, scene);
        let previous = self.current.filter(|&p| p != handle);

        if let (Some(duration), Some(previous)) = (fade, previous)
            && let Some(action) = mixer.action_mut(previous)
        {
            action.fade_out(duration);
        }

        let action = mixer.action_mut(handle)?;
        action.reset().set_loop(LoopMode::Repeat).play();
        action.clamp_when_finished = false;
        if let (Some(duration), Some(_)) = (fade, previous) {
            action.fade_in(duration);
        }

        self.current = Some(handle);
        log::info!("Animation '{}' started ({:.2}s)", clip.name, clip.duration);
        self.events.push(DirectorEvent::ClipStarted(clip.name.clone()));
        Some(handle)
    }

    fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.name.as_str()).collect()
    }
}

pub mod values;
pub mod tracks;
pub mod clip;
pub mod action;
pub mod binding;
pub mod binder;
pub mod mixer;
pub mod resolve;
pub mod director;

pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use action::{AnimationAction, LoopMode, TrackValue};
pub use mixer::{ActionHandle, AnimationMixer};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
pub use resolve::{ClipLookup, resolve_clip, transition_chain};
pub use director::{AnimationConfig, AnimationDirector, DirectorEvent, IntroConfig};

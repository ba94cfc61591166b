//! Rigged-character viewer core.
//!
//! Loads a glTF character, keeps exactly one "current" animation playing with
//! crossfaded transitions, optionally runs a one-shot intro before settling
//! into a loop, and turns the head toward the pointer on top of whatever the
//! body is doing. Drawing is delegated to a [`RenderBackend`].
//!
//! - [`assets`]: background glTF/GLB loading
//! - [`animation`]: clips, actions, mixer and the [`AnimationDirector`]
//! - [`head_look`]: pointer-driven bone override
//! - [`viewer`]: [`AvatarViewer`] and the [`FrameLoop`]
//! - [`portfolio`]: menu table, chat and voice clients, edge scrolling

pub mod animation;
pub mod assets;
pub mod errors;
pub mod head_look;
pub mod portfolio;
pub mod scene;
pub mod utils;
pub mod viewer;

pub use animation::{AnimationClip, AnimationDirector, AnimationMixer, ClipLookup, DirectorEvent, LoopMode};
pub use assets::{AssetLoader, LoaderOptions, SceneAsset};
pub use errors::{Result, ViewerError};
pub use head_look::{HeadLookConfig, HeadLookController};
pub use scene::{Camera, Node, NodeHandle, Scene};
pub use viewer::{AvatarViewer, FrameLoop, LoopControl, RenderBackend, ViewerConfig, ViewerStatus};

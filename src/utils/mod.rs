//! Utility Module
//!
//! - [`FrameClock`]: capped per-frame deltas for the frame loop
//! - [`Ray`] / [`Plane`]: picking geometry used by head tracking

pub mod ray;
pub mod time;

pub use ray::{Plane, Ray};
pub use time::FrameClock;

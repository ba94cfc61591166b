//! Edge-triggered horizontal scrolling of the bottom menu.
//!
//! Hovering within `zone_fraction` of either viewport edge scrolls toward that
//! edge, faster the closer the pointer is to it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeScroll {
    /// Width of each active zone as a fraction of the viewport.
    pub zone_fraction: f32,
    /// Pixels per frame at the very edge.
    pub speed: f32,
}

impl Default for EdgeScroll {
    fn default() -> Self {
        Self {
            zone_fraction: 0.12,
            speed: 8.0,
        }
    }
}

impl EdgeScroll {
    /// Scroll offset change for this frame. Negative scrolls left.
    #[must_use]
    pub fn delta(&self, mouse_x: f32, viewport_width: f32) -> f32 {
        let zone = viewport_width * self.zone_fraction;
        if zone <= 0.0 {
            return 0.0;
        }
        if mouse_x < zone {
            -self.speed * (1.0 - mouse_x / zone)
        } else if mouse_x > viewport_width - zone {
            self.speed * (1.0 - (viewport_width - mouse_x) / zone)
        } else {
            0.0
        }
    }
}

/// [`EdgeScroll::delta`] with the default zone and speed.
#[must_use]
pub fn edge_scroll_delta(mouse_x: f32, viewport_width: f32) -> f32 {
    EdgeScroll::default().delta(mouse_x, viewport_width)
}

/// Applies `delta` and clamps to `[0, max]`. Content that fits (`max <= 0`)
/// does not scroll.
#[must_use]
pub fn clamp_scroll(current: f32, delta: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return current;
    }
    (current + delta).clamp(0.0, max)
}

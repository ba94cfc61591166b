//! Clip lookup by name with fallbacks.
//!
//! A lookup is an ordered list of [`ClipLookup`] strategies; the first one that
//! resolves wins. Keeping the chain as data makes the fallback policy easy to
//! configure and to test on its own.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::animation::clip::AnimationClip;

/// One step of a clip resolution chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ClipLookup {
    /// Name equality, case-sensitive.
    Exact(String),
    /// Name equality, ignoring ASCII case.
    ExactIgnoreCase(String),
    /// Case-insensitive substring, with underscores treated as spaces.
    Fuzzy(String),
    /// Position in the asset's clip list.
    Index(usize),
    /// The first clip of the list.
    First,
}

impl ClipLookup {
    /// Returns the index of the clip this strategy selects, if any.
    #[must_use]
    pub fn find(&self, clips: &[Arc<AnimationClip>]) -> Option<usize> {
        match self {
            ClipLookup::Exact(name) => clips.iter().position(|c| c.name == *name),
            ClipLookup::ExactIgnoreCase(name) => clips.iter().position(|c| c.name_eq_ignore_case(name)),
            ClipLookup::Fuzzy(name) => {
                let needle = normalize(name);
                if needle.is_empty() {
                    return None;
                }
                clips.iter().position(|c| normalize(&c.name).contains(&needle))
            }
            ClipLookup::Index(index) => (*index < clips.len()).then_some(*index),
            ClipLookup::First => (!clips.is_empty()).then_some(0),
        }
    }
}

/// Tries each strategy in order and returns the first hit.
#[must_use]
pub fn resolve_clip(clips: &[Arc<AnimationClip>], chain: &[ClipLookup]) -> Option<usize> {
    chain.iter().find_map(|lookup| lookup.find(clips))
}

/// Chain used for user-driven transitions: exact name, then fuzzy match.
#[must_use]
pub fn transition_chain(name: &str) -> [ClipLookup; 2] {
    [ClipLookup::Exact(name.to_string()), ClipLookup::Fuzzy(name.to_string())]
}

fn normalize(name: &str) -> String {
    name.trim().replace('_', " ").to_lowercase()
}

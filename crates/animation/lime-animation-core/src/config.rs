//! Positioner and clock configuration.

use serde::{Deserialize, Serialize};

use crate::clock::AnimationClock;

/// Tuning for frame scrubbing. Defaults mirror the editor's behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionerConfig {
    /// Largest delta handed to a single subtree advance, in seconds.
    pub max_delta: f64,
    /// Largest chunk of a fast-forward between progress checks, in seconds.
    pub optimal_step: f64,
    /// Added past the target boundary so triggers on the last frame fire.
    pub frame_epsilon: f64,
    /// Frames kept behind the target when replaying after a backward scrub.
    /// Forward jumps beyond twice this distance rebuild the cache.
    pub rollback_budget: i32,
    /// Snapshot animation states to make forward scrubbing incremental.
    pub cache_animation_states: bool,
    /// Reset every animation in the subtree to zero before a replay, rather
    /// than only the scrubbed one.
    pub reset_animation_times: bool,
}

impl Default for PositionerConfig {
    fn default() -> Self {
        Self {
            max_delta: 0.1,
            optimal_step: 10.0,
            frame_epsilon: 1e-5,
            rollback_budget: 150,
            cache_animation_states: false,
            reset_animation_times: true,
        }
    }
}

impl PositionerConfig {
    pub fn clock(&self) -> AnimationClock {
        AnimationClock {
            max_delta: self.max_delta,
            optimal_step: self.optimal_step,
            frame_epsilon: self.frame_epsilon,
        }
    }
}

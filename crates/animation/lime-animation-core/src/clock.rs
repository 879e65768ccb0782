//! Trigger-safe forward stepping of a subtree to an exact frame boundary.

use crate::error::AnimationError;
use crate::node::{AdvanceContext, NodeRef};
use crate::time::frames_to_seconds;

/// Step limits used while fast-forwarding. Built from [`crate::PositionerConfig::clock`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClock {
    pub max_delta: f64,
    pub optimal_step: f64,
    pub frame_epsilon: f64,
}

impl Default for AnimationClock {
    fn default() -> Self {
        crate::PositionerConfig::default().clock()
    }
}

impl AnimationClock {
    /// Seconds from `time` to just past the start of `frame`.
    #[inline]
    pub fn delta_to_frame(&self, time: f64, frame: i32) -> f64 {
        frames_to_seconds(frame) - time + self.frame_epsilon
    }

    /// Advances `node`'s subtree by `delta` in chunks no larger than `max_delta`,
    /// so per-step logic never sees an oversized delta.
    pub fn safe_update(&self, node: &NodeRef, delta: f64, ctx: &AdvanceContext) {
        if self.max_delta <= 0.0 {
            node.advance_animations_recursive(delta, ctx);
            return;
        }
        let mut remain = delta;
        loop {
            let step = remain.min(self.max_delta);
            node.advance_animations_recursive(step, ctx);
            remain -= step;
            if remain <= 0.0 {
                break;
            }
        }
    }

    /// Moves animation `animation_id` on `node` forward until its time is
    /// within `frame_epsilon` past `frame`, advancing the whole subtree along
    /// the way and firing every trigger crossed. Jump markers are suppressed.
    ///
    /// Ends with a zero-delta update under `ctx` to resynchronise cached
    /// marker state. Does nothing but that update if the animation is already
    /// at or past the target.
    pub fn fast_forward_to_frame(
        &self,
        node: &NodeRef,
        animation_id: &str,
        frame: i32,
        ctx: &AdvanceContext,
    ) -> Result<(), AnimationError> {
        let forwarding = AdvanceContext {
            fast_forward: true,
            ..*ctx
        };
        loop {
            let time = self.time_of(node, animation_id)?;
            let forward = self.delta_to_frame(time, frame);
            let delta = forward.min(self.optimal_step);
            if delta > 0.0 {
                self.safe_update(node, delta, &forwarding);
            }
            if forward <= self.optimal_step {
                break;
            }
            if self.time_of(node, animation_id)? == time {
                log::warn!(
                    "fast-forward of '{}' to frame {} stalled at {:.5}s; is it running?",
                    animation_id,
                    frame,
                    time
                );
                break;
            }
        }
        node.advance_animations_recursive(0.0, ctx);
        Ok(())
    }

    fn time_of(&self, node: &NodeRef, animation_id: &str) -> Result<f64, AnimationError> {
        node.animation_time(animation_id)
            .ok_or_else(|| AnimationError::AnimationNotFound {
                node: node.id(),
                animation: animation_id.to_string(),
            })
    }
}

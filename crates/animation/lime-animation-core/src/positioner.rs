//! Editor scrubbing: place an animation on an arbitrary frame with every
//! side effect between frame zero and the target applied.
//!
//! With caching enabled the subtree is snapshotted after each replay, and
//! later forward scrubs step on from the snapshot instead of replaying from
//! zero. Backward scrubs, and forward jumps more than twice the rollback
//! budget past the snapshot, drop it and rebuild.

use serde::Serialize;

use crate::clock::AnimationClock;
use crate::config::PositionerConfig;
use crate::error::AnimationError;
use crate::node::{AdvanceContext, NodeRef};
use crate::state_cache;

/// Which path a scrub took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrubOutcome {
    /// Animation mode off: the frame was set without replaying.
    Direct,
    /// Caching off: replayed from zero.
    Uncached,
    /// First cached scrub: replayed from zero and snapshotted at the target.
    CacheCreated,
    /// Stepped forward from the snapshot.
    Incremental { cached_frame: i32 },
    /// Target before the snapshot: replayed from zero to `rollback_frame`,
    /// snapshotted there, then stepped to the target.
    RolledBack { cached_frame: i32, rollback_frame: i32 },
    /// Target too far past the snapshot: stepped from the snapshot and
    /// re-snapshotted at the target.
    Rebased { cached_frame: i32 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PositionerStats {
    pub direct: u64,
    pub uncached: u64,
    pub cache_created: u64,
    pub incremental: u64,
    pub rolled_back: u64,
    pub rebased: u64,
}

impl PositionerStats {
    fn record(&mut self, outcome: ScrubOutcome) {
        let slot = match outcome {
            ScrubOutcome::Direct => &mut self.direct,
            ScrubOutcome::Uncached => &mut self.uncached,
            ScrubOutcome::CacheCreated => &mut self.cache_created,
            ScrubOutcome::Incremental { .. } => &mut self.incremental,
            ScrubOutcome::RolledBack { .. } => &mut self.rolled_back,
            ScrubOutcome::Rebased { .. } => &mut self.rebased,
        };
        *slot += 1;
    }

    /// Scrubs that replayed from frame zero.
    pub fn replays(&self) -> u64 {
        self.uncached + self.cache_created + self.rolled_back
    }
}

#[derive(Debug, Default)]
pub struct AnimationPositioner {
    cfg: PositionerConfig,
    clock: AnimationClock,
    stats: PositionerStats,
}

impl AnimationPositioner {
    pub fn new(cfg: PositionerConfig) -> Self {
        let clock = cfg.clock();
        Self {
            cfg,
            clock,
            stats: PositionerStats::default(),
        }
    }

    pub fn config(&self) -> &PositionerConfig {
        &self.cfg
    }

    pub fn stats(&self) -> &PositionerStats {
        &self.stats
    }

    pub fn cache_enabled(&self) -> bool {
        self.cfg.cache_animation_states
    }

    /// Disabling drops any snapshot held under `root`.
    pub fn set_cache_enabled(&mut self, enabled: bool, root: &NodeRef) {
        self.cfg.cache_animation_states = enabled;
        if !enabled {
            state_cache::remove(root);
        }
    }

    /// Places `animation_id` on `node` at `frame`.
    ///
    /// In animation mode the subtree is replayed up to the frame with audio
    /// muted and `Stop`/`Jump` markers on `node` ignored, then every animation
    /// in it is stopped. Otherwise the frame is set directly and particles are
    /// cleared.
    pub fn set_animation_frame(
        &mut self,
        node: &NodeRef,
        animation_id: &str,
        frame: i32,
        animation_mode: bool,
    ) -> Result<ScrubOutcome, AnimationError> {
        if !node.has_animation(animation_id) {
            return Err(AnimationError::AnimationNotFound {
                node: node.id(),
                animation: animation_id.to_string(),
            });
        }
        let frame = frame.max(0);
        let ctx = AdvanceContext {
            fast_forward: false,
            audio_enabled: false,
            record_triggers: false,
        };

        let outcome = if animation_mode {
            node.set_ignore_markers(true);
            let result = self.replay_to(node, animation_id, frame, &ctx);
            node.set_ignore_markers(false);
            let outcome = result?;
            node.advance_animations_recursive(0.0, &ctx);
            outcome
        } else {
            node.set_frame(animation_id, frame);
            node.advance_animations_recursive(0.0, &ctx);
            node.clear_particles_recursive();
            ScrubOutcome::Direct
        };

        log::debug!(
            "positioned '{}' on '{}' at frame {}: {:?}",
            animation_id,
            node.id(),
            frame,
            outcome
        );
        self.stats.record(outcome);
        Ok(outcome)
    }

    fn replay_to(
        &self,
        node: &NodeRef,
        animation_id: &str,
        frame: i32,
        ctx: &AdvanceContext,
    ) -> Result<ScrubOutcome, AnimationError> {
        let mut cached = state_cache::cached_frame(node, animation_id);
        let mut outcome = None;

        if self.cfg.cache_animation_states && cached.is_none() {
            self.reset_times(node, animation_id);
            node.set_running(animation_id, true);
            self.clock
                .fast_forward_to_frame(node, animation_id, frame, ctx)?;
            state_cache::create(node, true);
            cached = Some(frame);
            outcome = Some(ScrubOutcome::CacheCreated);
        }

        match cached {
            None => self.reset_times(node, animation_id),
            Some(_) => {
                if !state_cache::restore(node) {
                    state_cache::create(node, false);
                }
            }
        }
        node.clear_particles_recursive();
        node.set_running(animation_id, true);

        if let Some(cached_frame) = cached {
            let budget = self.cfg.rollback_budget.max(0);
            let moving_back = cached_frame > frame;
            if moving_back || frame > cached_frame.saturating_add(budget.saturating_mul(2)) {
                state_cache::remove(node);
                if moving_back {
                    node.set_time(animation_id, 0.0);
                    node.stop_animations_recursive();
                    node.set_running(animation_id, true);
                    let rollback_frame = (frame - budget).max(0);
                    self.clock
                        .fast_forward_to_frame(node, animation_id, rollback_frame, ctx)?;
                    outcome = Some(ScrubOutcome::RolledBack {
                        cached_frame,
                        rollback_frame,
                    });
                } else {
                    self.clock
                        .fast_forward_to_frame(node, animation_id, frame, ctx)?;
                    outcome = Some(ScrubOutcome::Rebased { cached_frame });
                }
                state_cache::create(node, false);
            } else if outcome.is_none() {
                outcome = Some(ScrubOutcome::Incremental { cached_frame });
            }
        }

        self.clock
            .fast_forward_to_frame(node, animation_id, frame, ctx)?;
        node.stop_animations_recursive();
        Ok(outcome.unwrap_or(ScrubOutcome::Uncached))
    }

    fn reset_times(&self, node: &NodeRef, animation_id: &str) {
        if self.cfg.reset_animation_times {
            node.set_time_recursive(0.0);
        } else {
            node.set_time(animation_id, 0.0);
        }
    }
}

//! Stock node behaviours with observable side effects.

use std::any::Any;

use serde::Serialize;

use crate::node::{AdvanceContext, NodeBehavior};

/// Emits particles at a fixed rate while the node advances.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParticleEmitter {
    rate: f64,
    carry: f64,
    alive: u64,
    emitted: u64,
    clears: u32,
}

impl ParticleEmitter {
    /// `rate` is in particles per second.
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    pub fn alive(&self) -> u64 {
        self.alive
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn clears(&self) -> u32 {
        self.clears
    }
}

impl NodeBehavior for ParticleEmitter {
    fn advance(&mut self, delta: f64, _ctx: &AdvanceContext) {
        if delta <= 0.0 {
            return;
        }
        self.carry += delta * self.rate;
        let whole = self.carry.floor();
        self.carry -= whole;
        self.alive += whole as u64;
        self.emitted += whole as u64;
    }

    fn clear_particles(&mut self) {
        self.alive = 0;
        self.carry = 0.0;
        self.clears += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Plays a sound on its `play` trigger unless audio is muted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AudioSource {
    plays: u32,
    suppressed: u32,
}

impl AudioSource {
    pub const PLAY_TRIGGER: &'static str = "play";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> u32 {
        self.plays
    }

    pub fn suppressed(&self) -> u32 {
        self.suppressed
    }
}

impl NodeBehavior for AudioSource {
    fn trigger(&mut self, name: &str, ctx: &AdvanceContext) {
        if name != Self::PLAY_TRIGGER {
            return;
        }
        if ctx.audio_enabled {
            self.plays += 1;
        } else {
            self.suppressed += 1;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

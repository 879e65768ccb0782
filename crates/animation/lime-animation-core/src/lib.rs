//! Lime Animation Core (engine-agnostic)
//!
//! Hierarchical animation state for node trees: frame/second conversion,
//! trigger-safe fast-forwarding to exact frame boundaries, snapshot/restore of
//! subtree animation states, and the editor scrub policy built on top of them.

pub mod animation;
pub mod behaviors;
pub mod clock;
pub mod config;
pub mod error;
pub mod node;
pub mod positioner;
pub mod scene;
pub mod state_cache;
pub mod time;

// Re-exports for consumers (drivers and editors)
pub use animation::{AdvanceFlags, Animation, Marker, MarkerAction, Trigger};
pub use behaviors::{AudioSource, ParticleEmitter};
pub use clock::AnimationClock;
pub use config::PositionerConfig;
pub use error::{AnimationError, ConfigError};
pub use node::{AdvanceContext, Node, NodeBehavior, NodeRef};
pub use positioner::{AnimationPositioner, PositionerStats, ScrubOutcome};
pub use scene::{
    AnimationDesc, AnimationRange, AnimationRangeDesc, BehaviorDesc, NodeDesc, NodeFilter, Scene,
    SceneDesc,
};
pub use state_cache::{AnimationState, AnimationStates};
pub use time::{frames_to_seconds, seconds_to_frames, FRAMES_PER_SECOND, SECONDS_PER_FRAME};

//! Error types for animation positioning and scene loading.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimationError {
    #[error("Animation not found: '{animation}' on node '{node}'")]
    AnimationNotFound { node: String, animation: String },
}

/// Problems in scene descriptions, reported when they are loaded.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Animation range for '{animation}' lists both nodes and ignored nodes")]
    ConflictingFrameDirectives { animation: String },

    #[error("Animation range for '{animation}' ends at frame {end_frame} before it starts at {start_frame}")]
    InvalidRange {
        animation: String,
        start_frame: i32,
        end_frame: i32,
    },

    #[error("Jump marker '{marker}' targets unknown marker '{target}' in animation '{animation}'")]
    UnknownJumpTarget {
        animation: String,
        marker: String,
        target: String,
    },

    #[error("Scene JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

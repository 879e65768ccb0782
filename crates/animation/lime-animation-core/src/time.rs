//! Frame <-> seconds conversion.

pub const FRAMES_PER_SECOND: i32 = 30;
pub const SECONDS_PER_FRAME: f64 = 1.0 / FRAMES_PER_SECOND as f64;

/// Absorbs representation error so that `k / fps` seconds maps back to frame `k`.
const FRAME_TOLERANCE: f64 = 1e-6;

#[inline]
pub fn frames_to_seconds(frame: i32) -> f64 {
    frame as f64 / FRAMES_PER_SECOND as f64
}

/// Index of the frame containing `seconds` (floor).
#[inline]
pub fn seconds_to_frames(seconds: f64) -> i32 {
    (seconds * FRAMES_PER_SECOND as f64 + FRAME_TOLERANCE).floor() as i32
}

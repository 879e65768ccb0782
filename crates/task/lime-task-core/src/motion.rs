//! Interpolated value streams driven by the tick delta.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::context::TaskContext;
use crate::sequence::{StepSequence, Yield};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionCurve {
    /// Eases out along a quarter sine wave.
    Sin,
    Sqrt,
    Linear,
}

impl MotionCurve {
    fn shape(self, x: f32) -> f32 {
        match self {
            MotionCurve::Sin => (x * FRAC_PI_2).sin(),
            MotionCurve::Sqrt => x.sqrt(),
            MotionCurve::Linear => x,
        }
    }
}

#[inline]
fn lerp(t: f32, from: f32, to: f32) -> f32 {
    from + (to - from) * t
}

/// Values from `from` towards `to` over `period` seconds. The first value is
/// taken at time zero, each following one after the delta passed to that
/// call; the last value is always exactly `to`.
#[derive(Clone, Debug)]
pub struct Motion {
    curve: MotionCurve,
    period: f32,
    from: f32,
    to: f32,
    elapsed: f32,
    started: bool,
    finished: bool,
}

impl Motion {
    pub fn new(curve: MotionCurve, period: f32, from: f32, to: f32) -> Self {
        Self {
            curve,
            period,
            from,
            to,
            elapsed: 0.0,
            started: false,
            finished: false,
        }
    }

    pub fn sin(period: f32, from: f32, to: f32) -> Self {
        Self::new(MotionCurve::Sin, period, from, to)
    }

    pub fn sqrt(period: f32, from: f32, to: f32) -> Self {
        Self::new(MotionCurve::Sqrt, period, from, to)
    }

    pub fn linear(period: f32, from: f32, to: f32) -> Self {
        Self::new(MotionCurve::Linear, period, from, to)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn next_value(&mut self, delta: f32) -> Option<f32> {
        if self.finished {
            return None;
        }
        if self.started {
            self.elapsed += delta;
        } else {
            self.started = true;
        }
        if self.elapsed < self.period {
            Some(lerp(
                self.curve.shape(self.elapsed / self.period),
                self.from,
                self.to,
            ))
        } else {
            self.finished = true;
            Some(self.to)
        }
    }
}

/// Feeds a motion into a setter, one value per tick.
pub struct Animate<S> {
    motion: Motion,
    setter: S,
}

pub fn animate<S: FnMut(f32)>(motion: Motion, setter: S) -> Animate<S> {
    Animate { motion, setter }
}

impl<S: FnMut(f32)> StepSequence for Animate<S> {
    fn resume(&mut self, ctx: &mut TaskContext<'_>) -> Option<Yield> {
        let value = self.motion.next_value(ctx.delta())?;
        (self.setter)(value);
        Some(Yield::NextTick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_period_jumps_to_target() {
        let mut m = Motion::sin(0.0, 1.0, 5.0);
        assert_eq!(m.next_value(0.1), Some(5.0));
        assert_eq!(m.next_value(0.1), None);
    }

    #[test]
    fn curves_hit_endpoints() {
        for curve in [MotionCurve::Sin, MotionCurve::Sqrt, MotionCurve::Linear] {
            assert_eq!(curve.shape(0.0), 0.0);
            assert!((curve.shape(1.0) - 1.0).abs() < 1e-6);
        }
    }
}

//! Fade-out tween for stopping playback
//!
//! The stop sequence ramps the player volume from 1.0 to 0.0 in fixed time
//! steps before tearing the session down. Curves:
//! - Linear: straight ramp (default)
//! - SquareRoot: holds loudness longer, then drops
//! - S-Curve: slow start and end
//! - Equal Power: constant perceived loudness decay

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::time::Duration;
use tokio::time::{self, Instant, Interval};

/// Fade curve type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FadeCurve {
    /// Linear fade: simple and predictable
    #[default]
    Linear,

    /// Square root fade
    SquareRoot,

    /// S-Curve fade: slow start, fast middle, slow end
    SCurve,

    /// Equal power fade
    EqualPower,
}

impl FadeCurve {
    /// Calculate the fade gain at a given position
    ///
    /// # Arguments
    /// * `position` - Normalized position in the fade (0.0 to 1.0)
    /// * `fade_out` - If true, calculates fade-out gain; if false, fade-in gain
    ///
    /// # Returns
    /// Gain multiplier (0.0 to 1.0)
    #[inline]
    pub fn calculate_gain(&self, position: f32, fade_out: bool) -> f32 {
        let position = position.clamp(0.0, 1.0);
        let t = if fade_out { 1.0 - position } else { position };

        match self {
            FadeCurve::Linear => t,
            FadeCurve::SquareRoot => {
                if t <= 0.0 {
                    0.0
                } else {
                    t.powf(0.5)
                }
            }
            FadeCurve::SCurve => (1.0 - (PI * t).cos()) * 0.5,
            FadeCurve::EqualPower => (t * PI * 0.5).sin(),
        }
    }
}

/// Time-stepped fade-out
///
/// Each call to [`FadeOut::next_gain`] waits for the next step and yields
/// the volume for it; the last step always yields exactly 0.0.
#[derive(Debug)]
pub struct FadeOut {
    curve: FadeCurve,
    steps: u32,
    step: u32,
    interval: Interval,
}

impl FadeOut {
    pub fn new(duration: Duration, steps: u32, curve: FadeCurve) -> Self {
        let steps = steps.max(1);
        let period = (duration / steps).max(Duration::from_millis(1));
        Self {
            curve,
            steps,
            step: 0,
            // first step lands one period in, the last one at `duration`
            interval: time::interval_at(Instant::now() + period, period),
        }
    }

    /// Volume for the next step, `None` once the fade is complete
    ///
    /// Cancel safe: a dropped call does not consume a step.
    pub async fn next_gain(&mut self) -> Option<f32> {
        if self.is_finished() {
            return None;
        }
        self.interval.tick().await;
        self.step += 1;
        if self.step == self.steps {
            return Some(0.0);
        }
        Some(
            self.curve
                .calculate_gain(self.step as f32 / self.steps as f32, true),
        )
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps
    }
}

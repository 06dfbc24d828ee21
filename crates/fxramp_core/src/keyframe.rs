// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for automation envelopes.

use serde::{Deserialize, Serialize};

/// Interpolation mode from a keyframe to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InterpolationMode {
    /// Straight line to the next keyframe
    #[default]
    Linear,
    /// Eased curve with flat tangents at both ends
    Smooth,
}

impl InterpolationMode {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Smooth => "Smooth",
        }
    }
}

/// A single point of an automation envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time in host time units
    pub time: f64,
    /// Parameter value at this time
    pub value: f64,
    /// Interpolation mode to next keyframe
    pub interpolation: InterpolationMode,
}

impl Keyframe {
    /// Create a new linear keyframe
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            interpolation: InterpolationMode::Linear,
        }
    }

    /// Create a new smooth keyframe
    pub fn smooth(time: f64, value: f64) -> Self {
        Self::new(time, value).with_interpolation(InterpolationMode::Smooth)
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    /// Interpolate from this keyframe towards `next` at normalized position `t`
    pub fn interpolate(&self, next: &Keyframe, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self.interpolation {
            InterpolationMode::Linear => Interpolation::lerp(self.value, next.value, t),
            InterpolationMode::Smooth => {
                Interpolation::hermite(self.value, 0.0, next.value, 0.0, t)
            }
        }
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two values
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }

    /// Hermite spline interpolation
    pub fn hermite(p0: f64, m0: f64, p1: f64, m1: f64, t: f64) -> f64 {
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_constructor() {
        let kf = Keyframe::smooth(10.0, 0.5);
        assert_eq!(kf.interpolation, InterpolationMode::Smooth);
        assert_eq!(kf.time, 10.0);
        assert_eq!(kf.value, 0.5);
        assert_eq!(Keyframe::new(0.0, 0.0).interpolation, InterpolationMode::Linear);
    }

    #[test]
    fn test_smooth_segment_shape() {
        let a = Keyframe::smooth(0.0, 0.0);
        let b = Keyframe::smooth(100.0, 1.0);

        assert_eq!(a.interpolate(&b, 0.0), 0.0);
        assert_eq!(a.interpolate(&b, 1.0), 1.0);
        assert!((a.interpolate(&b, 0.5) - 0.5).abs() < 1e-12);
        // Eases in: slower than linear near the start
        assert!(a.interpolate(&b, 0.1) < 0.1);
        // Eases out: faster than linear near the end
        assert!(a.interpolate(&b, 0.9) > 0.9);
    }

    #[test]
    fn test_linear_segment() {
        let a = Keyframe::new(0.0, 2.0);
        let b = Keyframe::new(1.0, 4.0);
        assert_eq!(a.interpolate(&b, 0.25), 2.5);
        // Clamped outside the segment
        assert_eq!(a.interpolate(&b, 2.0), 4.0);
    }
}

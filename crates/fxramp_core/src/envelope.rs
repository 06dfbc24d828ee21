// SPDX-License-Identifier: MIT OR Apache-2.0
//! Automation envelope owned by a parameter.
//!
//! An envelope is an ordered list of keyframes with strictly increasing
//! times. Edits replace the whole list at once: the candidate list is
//! validated before anything is written, so a rejected edit leaves the
//! previous keyframes in place.

use crate::keyframe::Keyframe;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Envelope errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvelopeError {
    /// Keyframe time is not after the previous keyframe
    #[error("Keyframe {index} is not strictly after the previous keyframe")]
    UnorderedKeyframes {
        /// Index of the offending keyframe
        index: usize,
    },

    /// Keyframe time or value is NaN or infinite
    #[error("Keyframe {index} has a non-finite time or value")]
    NonFiniteKeyframe {
        /// Index of the offending keyframe
        index: usize,
    },
}

/// Automation envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Envelope {
    keyframes: Vec<Keyframe>,
}

impl Envelope {
    /// Create an empty envelope
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an envelope from keyframes, validating their order
    pub fn from_keyframes(keyframes: Vec<Keyframe>) -> Result<Self, EnvelopeError> {
        validate(&keyframes)?;
        Ok(Self { keyframes })
    }

    /// Replace every keyframe in one step.
    ///
    /// On error the current keyframes are left unchanged.
    pub fn replace_keyframes(&mut self, keyframes: Vec<Keyframe>) -> Result<(), EnvelopeError> {
        validate(&keyframes)?;
        self.keyframes = keyframes;
        Ok(())
    }

    /// Remove all keyframes
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the envelope has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// First keyframe
    pub fn first(&self) -> Option<&Keyframe> {
        self.keyframes.first()
    }

    /// Last keyframe
    pub fn last(&self) -> Option<&Keyframe> {
        self.keyframes.last()
    }

    /// Evaluate the envelope value at a given time.
    ///
    /// Values hold flat before the first and after the last keyframe.
    pub fn evaluate(&self, time: f64) -> Option<f64> {
        let first = self.first()?;

        // First keyframe strictly after `time`
        let next_idx = self.keyframes.partition_point(|k| k.time <= time);

        match next_idx {
            0 => Some(first.value),
            idx if idx == self.len() => self.last().map(|k| k.value),
            idx => {
                let a = &self.keyframes[idx - 1];
                let b = &self.keyframes[idx];
                let t = (time - a.time) / (b.time - a.time);
                Some(a.interpolate(b, t))
            }
        }
    }
}

impl TryFrom<Vec<Keyframe>> for Envelope {
    type Error = EnvelopeError;

    fn try_from(keyframes: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::from_keyframes(keyframes)
    }
}

impl From<Envelope> for Vec<Keyframe> {
    fn from(envelope: Envelope) -> Self {
        envelope.keyframes
    }
}

fn validate(keyframes: &[Keyframe]) -> Result<(), EnvelopeError> {
    for (index, kf) in keyframes.iter().enumerate() {
        if !kf.time.is_finite() || !kf.value.is_finite() {
            return Err(EnvelopeError::NonFiniteKeyframe { index });
        }
        if index > 0 && kf.time <= keyframes[index - 1].time {
            return Err(EnvelopeError::UnorderedKeyframes { index });
        }
    }
    Ok(())
}

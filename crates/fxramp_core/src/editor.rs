// SPDX-License-Identifier: MIT OR Apache-2.0
//! Envelope editor: attach an effect and write a two-point ramp.
//!
//! The edit runs in a fixed order:
//! 1. Validate the selected event's time range
//! 2. Validate the ramp values as a candidate envelope
//! 3. Resolve the effect descriptor by name
//! 4. Attach the effect to the event
//! 5. Resolve the parameter on the new instance
//! 6. Get or create the parameter's envelope
//! 7. Replace the envelope's keyframes in one step
//!
//! Nothing is mutated before step 4, and the envelope is only written once
//! every check has passed.

use crate::effect::{EffectId, EffectRegistry};
use crate::envelope::{Envelope, EnvelopeError};
use crate::host::{AutomatableParameter, EffectInstance, TimelineEvent};
use crate::keyframe::Keyframe;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Effect name used when none is configured
pub const DEFAULT_EFFECT_NAME: &str = "MyBezierFx";

/// Parameter name used when none is configured
pub const DEFAULT_PARAMETER_NAME: &str = "Curve";

/// Errors produced by an envelope edit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// No event selected, or the event's time range is empty
    #[error("Select an event with a non-empty time range first")]
    InvalidSelection,

    /// Effect name did not resolve to exactly one descriptor
    #[error("Could not find video effect: {name}")]
    EffectNotFound {
        /// Requested effect name
        name: String,
    },

    /// Parameter name did not resolve to exactly one parameter
    #[error("Parameter not found: {name} (available: {})", .available.join(", "))]
    ParameterNotFound {
        /// Requested parameter name
        name: String,
        /// Parameter names the attached effect exposes
        available: Vec<String>,
    },

    /// Parameter cannot carry an automation envelope
    #[error("Parameter {parameter} does not support automation envelopes")]
    EnvelopeUnavailable {
        /// Parameter name
        parameter: String,
    },

    /// Ramp values cannot form a valid envelope
    #[error("Invalid ramp: {0}")]
    InvalidRamp(#[from] EnvelopeError),
}

/// Result type for envelope edits
pub type Result<T> = std::result::Result<T, EditError>;

/// A complete ramp edit request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampRequest {
    /// Displayed name of the effect to attach
    pub effect_name: String,
    /// Effect chain slot to attach at
    pub slot: usize,
    /// Name of the parameter to automate
    pub parameter_name: String,
    /// Value at the event start
    pub start_value: f64,
    /// Value at the event end
    pub end_value: f64,
}

impl Default for RampRequest {
    fn default() -> Self {
        Self {
            effect_name: DEFAULT_EFFECT_NAME.to_string(),
            slot: 0,
            parameter_name: DEFAULT_PARAMETER_NAME.to_string(),
            start_value: 0.0,
            end_value: 1.0,
        }
    }
}

/// Locator for an envelope written by the editor.
///
/// The handle owns no host state. Use [`EnvelopeHandle::resolve`] to read
/// the live envelope; it returns `None` once the effect instance is no
/// longer at the recorded slot.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeHandle {
    /// Effect chain slot the effect ended up in
    pub slot: usize,
    /// Identity of the attached effect instance
    pub effect_id: EffectId,
    /// Index of the parameter within the effect
    pub parameter_index: usize,
    /// Name of the automated parameter
    pub parameter_name: String,
    /// Keyframes written by the edit
    pub keyframes: Vec<Keyframe>,
}

impl EnvelopeHandle {
    /// Look up the live envelope on `event`
    pub fn resolve<'a, E: TimelineEvent>(&self, event: &'a E) -> Option<&'a Envelope> {
        let effect = event.effect(self.slot)?;
        if effect.instance_id() != self.effect_id {
            return None;
        }
        let parameter = effect.parameters().get(self.parameter_index)?;
        if parameter.name() != self.parameter_name {
            return None;
        }
        parameter.envelope()
    }
}

/// Writes ramp envelopes onto effect parameters
pub struct EnvelopeEditor<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R: EffectRegistry + ?Sized> EnvelopeEditor<'r, R> {
    /// Create an editor resolving effects from `registry`
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Apply a [`RampRequest`] to `event`
    pub fn apply<E: TimelineEvent>(
        &self,
        event: Option<&mut E>,
        request: &RampRequest,
    ) -> Result<EnvelopeHandle> {
        self.apply_linear_ramp(
            event,
            &request.effect_name,
            request.slot,
            &request.parameter_name,
            request.start_value,
            request.end_value,
        )
    }

    /// Attach `effect_name` to `event` at `slot` and ramp `parameter_name`
    /// from `start_value` at the event start to `end_value` at its end.
    ///
    /// On success the parameter's envelope holds exactly two smooth
    /// keyframes. Running the same edit again on the same parameter yields
    /// the same envelope. On failure an existing envelope is left as it was.
    pub fn apply_linear_ramp<E: TimelineEvent>(
        &self,
        event: Option<&mut E>,
        effect_name: &str,
        slot: usize,
        parameter_name: &str,
        start_value: f64,
        end_value: f64,
    ) -> Result<EnvelopeHandle> {
        let Some(event) = event else {
            tracing::warn!("No event selected");
            return Err(EditError::InvalidSelection);
        };

        let (start, end) = (event.start(), event.end());
        if !(start.is_finite() && end.is_finite() && end > start) {
            tracing::warn!("Event has an empty time range [{start}, {end})");
            return Err(EditError::InvalidSelection);
        }

        let keyframes = vec![
            Keyframe::smooth(start, start_value),
            Keyframe::smooth(end, end_value),
        ];
        // Reject bad values before the host is touched
        Envelope::from_keyframes(keyframes.clone()).inspect_err(|e| {
            tracing::warn!("Rejected ramp {start_value} -> {end_value}: {e}");
        })?;

        let Some(descriptor) = self.registry.resolve_effect(effect_name) else {
            tracing::warn!("Effect {effect_name:?} did not resolve to a single descriptor");
            return Err(EditError::EffectNotFound {
                name: effect_name.to_string(),
            });
        };
        tracing::debug!("Resolved effect {:?} ({:?})", descriptor.name, descriptor.id);

        let (slot, effect) = event.attach_effect(descriptor, slot);
        let effect_id = effect.instance_id();
        tracing::debug!("Attached {:?} at slot {slot}", effect.descriptor_name());

        let parameter_index = find_parameter(effect.parameters(), parameter_name)?;
        let parameter = &mut effect.parameters_mut()[parameter_index];

        let Some(envelope) = parameter.create_envelope() else {
            tracing::warn!("Parameter {parameter_name:?} cannot be automated");
            return Err(EditError::EnvelopeUnavailable {
                parameter: parameter_name.to_string(),
            });
        };
        envelope.replace_keyframes(keyframes.clone())?;

        tracing::info!(
            "Wrote ramp on {parameter_name:?}: {start_value} @ {start} -> {end_value} @ {end}"
        );

        Ok(EnvelopeHandle {
            slot,
            effect_id,
            parameter_index,
            parameter_name: parameter_name.to_string(),
            keyframes,
        })
    }
}

/// Find the single parameter named exactly `name`
fn find_parameter<P: AutomatableParameter>(parameters: &[P], name: &str) -> Result<usize> {
    let mut matches = parameters
        .iter()
        .enumerate()
        .filter(|(_, p)| p.name() == name)
        .map(|(index, _)| index);

    match (matches.next(), matches.next()) {
        (Some(index), None) => Ok(index),
        _ => {
            let available: Vec<String> =
                parameters.iter().map(|p| p.name().to_string()).collect();
            tracing::warn!("Parameter {name:?} not found among [{}]", available.join(", "));
            Err(EditError::ParameterNotFound {
                name: name.to_string(),
                available,
            })
        }
    }
}

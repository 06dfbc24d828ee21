// SPDX-License-Identifier: MIT OR Apache-2.0
//! Capability interface a host project must provide.
//!
//! The editor never reaches into host internals. Version differences in a
//! host's object model belong in the adapter that implements these traits.

use crate::effect::{EffectDescriptor, EffectId};
use crate::envelope::Envelope;

/// An event on a host timeline
pub trait TimelineEvent {
    /// Effect instance type attached to this event
    type Effect: EffectInstance;

    /// Event start time in host time units
    fn start(&self) -> f64;

    /// Event end time in host time units
    fn end(&self) -> f64;

    /// Attach a new instance of `descriptor` at `slot`.
    ///
    /// What happens to an effect already occupying the slot is host policy.
    /// Returns the slot the instance ended up in along with the instance.
    fn attach_effect(
        &mut self,
        descriptor: &EffectDescriptor,
        slot: usize,
    ) -> (usize, &mut Self::Effect);

    /// Effect currently at `slot`
    fn effect(&self, slot: usize) -> Option<&Self::Effect>;
}

/// An effect attached to an event
pub trait EffectInstance {
    /// Parameter type exposed by this effect
    type Parameter: AutomatableParameter;

    /// Identity of this instance, stable while it stays attached
    fn instance_id(&self) -> EffectId;

    /// Name of the descriptor this instance was created from
    fn descriptor_name(&self) -> &str;

    /// Parameters in declaration order
    fn parameters(&self) -> &[Self::Parameter];

    /// Mutable parameters in declaration order
    fn parameters_mut(&mut self) -> &mut [Self::Parameter];
}

/// A named numeric effect parameter
pub trait AutomatableParameter {
    /// Parameter name
    fn name(&self) -> &str;

    /// Current envelope, if one exists
    fn envelope(&self) -> Option<&Envelope>;

    /// Get the envelope, creating an empty one if absent.
    ///
    /// Returns the existing envelope when there already is one, and `None`
    /// when this parameter cannot be automated.
    fn create_envelope(&mut self) -> Option<&mut Envelope>;
}

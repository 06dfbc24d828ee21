// SPDX-License-Identifier: MIT OR Apache-2.0
//! Effect parameter automation for timeline events.
//!
//! This crate attaches a named effect to a timeline event and writes a
//! two-point ramp into one of the effect's parameter envelopes.
//!
//! ## Architecture
//!
//! - Keyframes and envelopes with a strict time-order invariant
//! - Effect descriptors resolved from a registry
//! - A capability interface the host project implements
//! - The envelope editor, which drives one edit through that interface
//! - An in-memory reference host with RON project files

pub mod editor;
pub mod effect;
pub mod envelope;
pub mod host;
pub mod keyframe;
pub mod memory;

pub use editor::{
    EditError, EnvelopeEditor, EnvelopeHandle, RampRequest, DEFAULT_EFFECT_NAME,
    DEFAULT_PARAMETER_NAME,
};
pub use effect::{DescriptorId, EffectDescriptor, EffectId, EffectRegistry, ParameterSpec};
pub use envelope::{Envelope, EnvelopeError};
pub use host::{AutomatableParameter, EffectInstance, TimelineEvent};
pub use keyframe::{Interpolation, InterpolationMode, Keyframe};
pub use memory::{
    Effect, EffectCatalog, Event, EventId, Parameter, Project, ProjectError, Track,
    PROJECT_FORMAT_VERSION,
};

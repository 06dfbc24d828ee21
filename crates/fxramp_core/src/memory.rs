// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory reference host.
//!
//! A small project model implementing the capability traits:
//! - Effect catalog (the installed effects)
//! - Tracks holding timeline events
//! - Effects and parameters attached to events
//!
//! Projects are stored as RON files.

use crate::effect::{DescriptorId, EffectDescriptor, EffectId, EffectRegistry};
use crate::envelope::Envelope;
use crate::host::{AutomatableParameter, EffectInstance, TimelineEvent};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Current project file format version
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Project file errors
#[derive(Debug, Error)]
pub enum ProjectError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid project
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Project could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// File was written by a newer format version
    #[error("Project version {found} is newer than supported version {PROJECT_FORMAT_VERSION}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
    },
}

/// Installed effects, keyed by descriptor ID
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectCatalog {
    effects: IndexMap<DescriptorId, EffectDescriptor>,
}

impl EffectCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an effect
    pub fn with_effect(mut self, descriptor: EffectDescriptor) -> Self {
        self.install(descriptor);
        self
    }

    /// Install an effect, replacing any descriptor with the same ID
    pub fn install(&mut self, descriptor: EffectDescriptor) -> DescriptorId {
        let id = descriptor.id;
        self.effects.insert(id, descriptor);
        id
    }

    /// Get a descriptor by ID
    pub fn get(&self, id: DescriptorId) -> Option<&EffectDescriptor> {
        self.effects.get(&id)
    }

    /// Number of installed effects
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether no effects are installed
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl EffectRegistry for EffectCatalog {
    fn descriptors(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.effects.values()
    }
}

/// Numeric effect parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Static value used when there is no envelope
    pub value: f64,
    /// Whether an envelope may be created
    pub automatable: bool,
    /// Automation envelope
    #[serde(default)]
    pub envelope: Option<Envelope>,
}

impl Parameter {
    /// Current value at `time`, following the envelope when present
    pub fn value_at(&self, time: f64) -> f64 {
        self.envelope
            .as_ref()
            .and_then(|e| e.evaluate(time))
            .unwrap_or(self.value)
    }
}

impl AutomatableParameter for Parameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    fn create_envelope(&mut self) -> Option<&mut Envelope> {
        if !self.automatable {
            return None;
        }
        Some(self.envelope.get_or_insert_with(Envelope::new))
    }
}

/// Effect instance attached to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Unique instance ID
    #[serde(default)]
    pub id: EffectId,
    /// Descriptor this instance was created from
    pub descriptor: DescriptorId,
    /// Descriptor display name
    pub name: String,
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
}

impl Effect {
    /// Instantiate a descriptor with default parameter values
    pub fn from_descriptor(descriptor: &EffectDescriptor) -> Self {
        Self {
            id: EffectId::new(),
            descriptor: descriptor.id,
            name: descriptor.name.clone(),
            parameters: descriptor
                .parameters
                .iter()
                .map(|spec| Parameter {
                    name: spec.name.clone(),
                    value: spec.default_value,
                    automatable: spec.automatable,
                    envelope: None,
                })
                .collect(),
        }
    }
}

impl EffectInstance for Effect {
    type Parameter = Parameter;

    fn instance_id(&self) -> EffectId {
        self.id
    }

    fn descriptor_name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut [Parameter] {
        &mut self.parameters
    }
}

/// Unique identifier for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new random event ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// An event on a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    #[serde(default)]
    pub id: EventId,
    /// Start time
    pub start: f64,
    /// End time
    pub end: f64,
    /// Whether the event is selected in the UI
    #[serde(default)]
    pub selected: bool,
    /// Effect chain, in slot order
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Event {
    /// Create an unselected event spanning `[start, end)`
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            id: EventId::new(),
            start,
            end,
            selected: false,
            effects: Vec::new(),
        }
    }

    /// Mark the event as selected
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

impl TimelineEvent for Event {
    type Effect = Effect;

    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    /// Inserts ahead of the effect at `slot`; slots past the end append.
    fn attach_effect(
        &mut self,
        descriptor: &EffectDescriptor,
        slot: usize,
    ) -> (usize, &mut Effect) {
        let slot = slot.min(self.effects.len());
        self.effects.insert(slot, Effect::from_descriptor(descriptor));
        (slot, &mut self.effects[slot])
    }

    fn effect(&self, slot: usize) -> Option<&Effect> {
        self.effects.get(slot)
    }
}

/// A track holding events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track name
    pub name: String,
    /// Events in timeline order
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Track {
    /// Create an empty track
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
        }
    }

    /// Add an event
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }
}

/// A project: installed effects plus the timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// File format version
    #[serde(default = "current_format_version")]
    pub version: u32,
    /// Installed effects
    #[serde(default)]
    pub catalog: EffectCatalog,
    /// Tracks in display order
    #[serde(default)]
    pub tracks: Vec<Track>,
}

fn current_format_version() -> u32 {
    PROJECT_FORMAT_VERSION
}

impl Default for Project {
    fn default() -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION,
            catalog: EffectCatalog::default(),
            tracks: Vec::new(),
        }
    }
}

impl Project {
    /// Create an empty project
    pub fn new() -> Self {
        Self::default()
    }

    /// First selected event, scanning tracks and events in order
    pub fn selected_event(&self) -> Option<&Event> {
        self.tracks
            .iter()
            .flat_map(|t| t.events.iter())
            .find(|e| e.selected)
    }

    /// Mutable access to the first selected event
    pub fn selected_event_mut(&mut self) -> Option<&mut Event> {
        self.tracks
            .iter_mut()
            .flat_map(|t| t.events.iter_mut())
            .find(|e| e.selected)
    }

    /// Split into the catalog and the selected event, for editing
    pub fn selection_mut(&mut self) -> (&EffectCatalog, Option<&mut Event>) {
        let event = self
            .tracks
            .iter_mut()
            .flat_map(|t| t.events.iter_mut())
            .find(|e| e.selected);
        (&self.catalog, event)
    }

    /// Load a project from a RON file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path)?;
        let project: Project = ron::from_str(&content)?;

        if project.version > PROJECT_FORMAT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: project.version,
            });
        }

        Ok(project)
    }

    /// Save the project to a RON file
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::ParameterSpec;

    fn blur() -> EffectDescriptor {
        EffectDescriptor::new("Blur")
            .with_parameter(ParameterSpec::numeric("Radius", 2.0))
            .with_parameter(ParameterSpec::fixed("Quality", 1.0))
    }

    #[test]
    fn test_selected_event_scans_in_order() {
        let mut project = Project::new();
        project.tracks.push(Track::new("V1").with_event(Event::new(0.0, 1.0)));
        project.tracks.push(
            Track::new("V2")
                .with_event(Event::new(2.0, 3.0).selected())
                .with_event(Event::new(4.0, 5.0).selected()),
        );

        let selected = project.selected_event().unwrap();
        assert_eq!(selected.start, 2.0);

        project.tracks[1].events[0].selected = false;
        assert_eq!(project.selected_event_mut().unwrap().start, 4.0);
    }

    #[test]
    fn test_no_selection() {
        let mut project = Project::new();
        project.tracks.push(Track::new("V1").with_event(Event::new(0.0, 1.0)));
        assert!(project.selected_event().is_none());
        assert!(project.selection_mut().1.is_none());
    }

    #[test]
    fn test_attach_inserts_at_slot() {
        let mut event = Event::new(0.0, 1.0);
        let other = EffectDescriptor::new("Other");

        let (slot, _) = event.attach_effect(&blur(), 0);
        assert_eq!(slot, 0);
        let (slot, _) = event.attach_effect(&other, 0);
        assert_eq!(slot, 0);
        assert_eq!(event.effects[0].name, "Other");
        assert_eq!(event.effects[1].name, "Blur");

        // Past the end appends
        let (slot, _) = event.attach_effect(&other, 10);
        assert_eq!(slot, 2);
    }

    #[test]
    fn test_create_envelope_is_idempotent() {
        let mut effect = Effect::from_descriptor(&blur());
        let radius = &mut effect.parameters[0];

        radius
            .create_envelope()
            .unwrap()
            .replace_keyframes(vec![crate::Keyframe::new(0.0, 1.0)])
            .unwrap();
        let again = radius.create_envelope().unwrap();
        assert_eq!(again.len(), 1);

        assert!(effect.parameters[1].create_envelope().is_none());
        assert!(effect.parameters[1].envelope.is_none());
    }

    #[test]
    fn test_value_at_follows_envelope() {
        let mut effect = Effect::from_descriptor(&blur());
        let radius = &mut effect.parameters[0];
        assert_eq!(radius.value_at(0.5), 2.0);

        radius.envelope = Some(
            Envelope::from_keyframes(vec![
                crate::Keyframe::new(0.0, 0.0),
                crate::Keyframe::new(1.0, 10.0),
            ])
            .unwrap(),
        );
        assert_eq!(radius.value_at(0.5), 5.0);
    }

    #[test]
    fn test_serialization() {
        let mut project = Project::new();
        let id = project.catalog.install(blur());
        project.tracks.push(Track::new("V1").with_event(Event::new(0.0, 10.0).selected()));

        let ron_str =
            ron::ser::to_string_pretty(&project, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: Project = ron::from_str(&ron_str).unwrap();

        assert_eq!(loaded.version, PROJECT_FORMAT_VERSION);
        assert_eq!(loaded.catalog.get(id).unwrap().name, "Blur");
        assert_eq!(loaded.tracks, project.tracks);
    }

    #[test]
    fn test_missing_version_saves_current() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.ron");
        std::fs::write(&path, "(tracks: [])").unwrap();

        let project = Project::load(&path).unwrap();
        assert_eq!(project.version, PROJECT_FORMAT_VERSION);
        assert_eq!(Project::default().version, PROJECT_FORMAT_VERSION);

        project.save(&path).unwrap();
        assert_eq!(Project::load(&path).unwrap().version, PROJECT_FORMAT_VERSION);
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains(&format!("version: {PROJECT_FORMAT_VERSION}")));
    }

    #[test]
    fn test_rejects_newer_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.ron");
        std::fs::write(&path, "(version: 99)").unwrap();

        let err = Project::load(&path).unwrap_err();
        assert!(matches!(err, ProjectError::UnsupportedVersion { found: 99 }));
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Effect descriptors and the registry they are resolved from.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an effect descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DescriptorId(pub Uuid);

impl DescriptorId {
    /// Create a new random descriptor ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DescriptorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for an attached effect instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectId(pub Uuid);

impl EffectId {
    /// Create a new random effect instance ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameter declared by an effect descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name
    pub name: String,
    /// Value a fresh instance starts with
    pub default_value: f64,
    /// Whether the parameter accepts an automation envelope
    pub automatable: bool,
}

impl ParameterSpec {
    /// Create an automatable numeric parameter
    pub fn numeric(name: impl Into<String>, default_value: f64) -> Self {
        Self {
            name: name.into(),
            default_value,
            automatable: true,
        }
    }

    /// Create a parameter that cannot carry an envelope
    pub fn fixed(name: impl Into<String>, default_value: f64) -> Self {
        Self {
            automatable: false,
            ..Self::numeric(name, default_value)
        }
    }
}

/// Immutable description of an installed effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    /// Unique descriptor ID
    pub id: DescriptorId,
    /// Displayed effect name
    pub name: String,
    /// Parameters every instance of this effect gets
    pub parameters: Vec<ParameterSpec>,
}

impl EffectDescriptor {
    /// Create a descriptor with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DescriptorId::new(),
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Add a parameter declaration
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// Source of installed effect descriptors
pub trait EffectRegistry {
    /// All installed descriptors
    fn descriptors(&self) -> impl Iterator<Item = &EffectDescriptor>;

    /// Resolve a descriptor by displayed name.
    ///
    /// Matching is exact but ignores case. Returns `None` when no descriptor
    /// or more than one descriptor matches.
    fn resolve_effect(&self, name: &str) -> Option<&EffectDescriptor> {
        let mut matches = self
            .descriptors()
            .filter(|d| names_match_ignore_case(&d.name, name));
        let found = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(found),
        }
    }
}

impl EffectRegistry for [EffectDescriptor] {
    fn descriptors(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.iter()
    }
}

impl EffectRegistry for Vec<EffectDescriptor> {
    fn descriptors(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.iter()
    }
}

fn names_match_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

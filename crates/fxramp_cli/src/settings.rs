// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ramp settings.
//!
//! Settings come from an optional RON file and are then overridden field by
//! field from the command line. Missing fields fall back to the defaults of
//! [`RampRequest`].

use fxramp_core::RampRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Settings file errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid settings RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Settings for one ramp run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampSettings {
    /// The edit to perform
    pub ramp: RampRequest,
    /// Log the result without writing the project back
    pub dry_run: bool,
}

impl RampSettings {
    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&content)?)
    }

    /// Load settings from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Per-field overrides from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Effect name
    pub effect: Option<String>,
    /// Parameter name
    pub parameter: Option<String>,
    /// Effect chain slot
    pub slot: Option<usize>,
    /// Value at event start
    pub start_value: Option<f64>,
    /// Value at event end
    pub end_value: Option<f64>,
    /// Force a dry run
    pub dry_run: bool,
}

impl RampSettings {
    /// Apply command-line overrides on top of loaded settings
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(effect) = overrides.effect {
            self.ramp.effect_name = effect;
        }
        if let Some(parameter) = overrides.parameter {
            self.ramp.parameter_name = parameter;
        }
        if let Some(slot) = overrides.slot {
            self.ramp.slot = slot;
        }
        if let Some(value) = overrides.start_value {
            self.ramp.start_value = value;
        }
        if let Some(value) = overrides.end_value {
            self.ramp.end_value = value;
        }
        self.dry_run |= overrides.dry_run;
        self
    }
}

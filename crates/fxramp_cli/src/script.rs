// SPDX-License-Identifier: MIT OR Apache-2.0
//! Run one ramp edit against a project file.

use crate::settings::RampSettings;
use anyhow::{Context, Result};
use fxramp_core::{EditError, EnvelopeEditor, Keyframe, Project};
use std::path::Path;

/// Outcome of a ramp run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Keyframes written to the envelope
    pub keyframes: Vec<Keyframe>,
    /// Slot the effect was attached at
    pub slot: usize,
    /// Whether the project file was rewritten
    pub saved: bool,
}

/// Load `project_path`, ramp the selected event, and save the project back
pub fn run(project_path: &Path, settings: &RampSettings) -> Result<RunReport> {
    let mut project = Project::load(project_path)
        .with_context(|| format!("failed to load project {}", project_path.display()))?;
    let installed = project.catalog.len();
    tracing::debug!(
        "Loaded project with {} tracks and {installed} installed effects",
        project.tracks.len()
    );

    let (catalog, selected) = project.selection_mut();
    let handle = match EnvelopeEditor::new(catalog).apply(selected, &settings.ramp) {
        Ok(handle) => handle,
        Err(EditError::InvalidSelection) => {
            anyhow::bail!("Select an event with a non-empty time range first, then run again")
        }
        Err(e @ EditError::EffectNotFound { .. }) => {
            return Err(e).with_context(|| format!("{installed} effects are installed"));
        }
        Err(e) => return Err(e.into()),
    };

    for kf in &handle.keyframes {
        tracing::info!(
            "Keyframe {} @ {} ({})",
            kf.value,
            kf.time,
            kf.interpolation.name()
        );
    }

    let saved = !settings.dry_run;
    if saved {
        project
            .save(project_path)
            .with_context(|| format!("failed to save project {}", project_path.display()))?;
        tracing::info!("Saved {}", project_path.display());
    } else {
        tracing::info!("Dry run: project not written");
    }

    Ok(RunReport {
        keyframes: handle.keyframes,
        slot: handle.slot,
        saved,
    })
}

//! Core quote and edit pipelines, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: projects and presets come in
//! through port traits and artifacts go out through a `WritePort`.

use crate::ports::{PresetSource, ProjectSource, WritePort};
use crate::settings::{EditSettings, QuoteSettings};
use anyhow::Context;
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use estimator_domain::{
    PricingError, Quoter, adjust_count, effective_config, layer_overrides, set_all_locks,
    set_confidence, set_count, set_lock, set_resolution,
};
use estimator_types::estimate::{Project, ProjectStatus};
use estimator_types::pricing::PricingConfig;
use estimator_types::quote::{Quote, ToolInfo};
use tracing::{debug, info, warn};

pub const QUOTE_FILE_NAME: &str = "quote.json";

/// Error type for pipeline results. Exit code 2 = the engine rejected the
/// input or configuration, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("project '{0}' is locked")]
    ProjectLocked(String),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Pricing(_) | ToolError::UnknownPreset(_) | ToolError::ProjectLocked(_) => 2,
            ToolError::Internal(_) => 1,
        }
    }
}

/// Outcome of `run_quote`.
#[derive(Debug, Clone)]
pub struct QuoteOutcome {
    pub project: Project,
    pub config: PricingConfig,
    pub quote: Quote,
}

/// Run the quote pipeline: load, resolve the effective config, quote.
///
/// The caller is responsible for writing artifacts (see
/// `write_quote_artifacts`).
pub fn run_quote(
    settings: &QuoteSettings,
    projects: &dyn ProjectSource,
    presets: &dyn PresetSource,
    tool: ToolInfo,
) -> Result<QuoteOutcome, ToolError> {
    let project = projects.load_project().context("load project")?;
    let config = resolve_config(&project, settings, presets)?;

    let quote = Quoter::new(config.clone())
        .quote(&project.estimate, tool)
        .map_err(|err| {
            warn!(
                item = err.item_id(),
                configuration = err.is_configuration_error(),
                "quote rejected: {err}"
            );
            err
        })?;
    info!(
        project = project.meta.id.as_str(),
        preset = config.id.as_str(),
        lines = quote.lines.len(),
        debt = quote.cohesion.debt_total,
        "quote computed"
    );

    Ok(QuoteOutcome {
        project,
        config,
        quote,
    })
}

/// Effective config for `project`: its preset (or the settings' override)
/// with stored overrides, then settings overrides, layered on top.
pub fn resolve_config(
    project: &Project,
    settings: &QuoteSettings,
    presets: &dyn PresetSource,
) -> Result<PricingConfig, ToolError> {
    let preset_id = settings
        .preset_id
        .as_deref()
        .unwrap_or(project.preset_id.as_str());
    let preset = presets
        .load_preset(preset_id)
        .with_context(|| format!("load preset {preset_id}"))?
        .ok_or_else(|| ToolError::UnknownPreset(preset_id.to_string()))?;

    let stored = project.overrides.clone().unwrap_or_default();
    let overrides = layer_overrides(&stored, &settings.overrides);
    debug!(
        preset = preset_id,
        overridden = !overrides.is_empty(),
        "resolving effective config"
    );
    Ok(effective_config(&preset, &overrides))
}

/// Write `quote.json` into `out_dir`.
pub fn write_quote_artifacts(
    outcome: &QuoteOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let quote_json = serde_json::to_string_pretty(&outcome.quote).context("serialize quote")?;
    writer.write_file(&out_dir.join(QUOTE_FILE_NAME), quote_json.as_bytes())?;
    Ok(())
}

/// Outcome of `run_edit`.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub project: Project,

    /// Ids of the items whose stored state changed.
    pub changed: Vec<String>,
}

/// Apply the edits described by `settings` to the loaded project.
///
/// The returned project is stamped with `now` when anything changed.
/// Locked projects refuse every edit.
pub fn run_edit(
    settings: &EditSettings,
    projects: &dyn ProjectSource,
    now: DateTime<Utc>,
) -> Result<EditOutcome, ToolError> {
    let mut project = projects.load_project().context("load project")?;
    if project.meta.status == ProjectStatus::Locked {
        return Err(ToolError::ProjectLocked(project.meta.id.clone()));
    }

    let before = project.estimate.items.clone();
    let mode = settings.mode;

    if settings.has_item_edits() {
        let item_id = settings
            .item_id
            .as_deref()
            .context("--item is required for item edits")?;
        let item = project
            .estimate
            .item_mut(item_id)
            .with_context(|| format!("no item with id '{item_id}'"))?;

        let mut next = item.clone();
        if let Some(level) = settings.resolution {
            next = set_resolution(&next, level, mode);
        }
        if let Some(confidence) = settings.confidence {
            next = set_confidence(&next, confidence, mode);
        }
        if let Some(count) = settings.count {
            next = set_count(&next, count, mode);
        }
        if let Some(delta) = settings.count_delta {
            next = adjust_count(&next, delta, mode);
        }
        if let Some(lock) = settings.lock {
            next = set_lock(&next, lock, mode);
        }
        *item = next;
    }

    if let Some(lock) = settings.all_locks {
        project.estimate.items = set_all_locks(&project.estimate.items, lock, mode);
    }

    let changed: Vec<String> = project
        .estimate
        .items
        .iter()
        .zip(&before)
        .filter(|(after, before)| after != before)
        .map(|(after, _)| after.id.clone())
        .collect();

    if !changed.is_empty() {
        project.touch(now);
    }
    debug!(changed = changed.len(), "edits applied");

    Ok(EditOutcome { project, changed })
}

/// Serialize `project` to `path`.
pub fn write_project(project: &Project, path: &Utf8Path, writer: &dyn WritePort) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(project).context("serialize project")?;
    writer.write_file(path, format!("{json}\n").as_bytes())
}

//! Default filesystem-backed port implementations.

use crate::ports::{PresetSource, ProjectSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use estimator_types::estimate::Project;
use estimator_types::pricing::PricingConfig;
use fs_err as fs;
use tracing::debug;

/// Loads a project from a JSON file.
#[derive(Debug, Clone)]
pub struct FsProjectSource {
    pub path: Utf8PathBuf,
}

impl FsProjectSource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl ProjectSource for FsProjectSource {
    fn load_project(&self) -> anyhow::Result<Project> {
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).with_context(|| format!("parse project {}", self.path))
    }
}

/// In-memory project source for embedding and testing.
#[derive(Debug, Clone)]
pub struct InMemoryProjectSource {
    project: Project,
}

impl InMemoryProjectSource {
    pub fn new(project: Project) -> Self {
        Self { project }
    }
}

impl ProjectSource for InMemoryProjectSource {
    fn load_project(&self) -> anyhow::Result<Project> {
        Ok(self.project.clone())
    }
}

/// Built-in presets plus any loaded from preset JSON files.
///
/// A file preset with the same id as a built-in replaces it.
#[derive(Debug, Clone)]
pub struct CatalogPresetSource {
    presets: Vec<PricingConfig>,
}

impl Default for CatalogPresetSource {
    fn default() -> Self {
        Self {
            presets: estimator_domain::builtin_presets(),
        }
    }
}

impl CatalogPresetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preset(mut self, preset: PricingConfig) -> Self {
        debug!(id = preset.id.as_str(), "registering preset");
        self.presets.retain(|p| p.id != preset.id);
        self.presets.push(preset);
        self
    }

    pub fn with_files(mut self, paths: &[Utf8PathBuf]) -> anyhow::Result<Self> {
        for path in paths {
            let preset = load_preset_file(path)?;
            self = self.with_preset(preset);
        }
        Ok(self)
    }
}

impl PresetSource for CatalogPresetSource {
    fn load_preset(&self, id: &str) -> anyhow::Result<Option<PricingConfig>> {
        Ok(self.presets.iter().find(|p| p.id == id).cloned())
    }

    fn list_presets(&self) -> anyhow::Result<Vec<PricingConfig>> {
        let mut presets = self.presets.clone();
        presets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(presets)
    }
}

pub fn load_preset_file(path: &Utf8Path) -> anyhow::Result<PricingConfig> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).with_context(|| format!("parse preset {}", path))
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

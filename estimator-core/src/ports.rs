//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use estimator_types::estimate::Project;
use estimator_types::pricing::PricingConfig;

/// Source of the project being quoted or edited.
pub trait ProjectSource {
    fn load_project(&self) -> anyhow::Result<Project>;
}

/// Lookup of pricing presets by id.
pub trait PresetSource {
    fn load_preset(&self, id: &str) -> anyhow::Result<Option<PricingConfig>>;
    fn list_presets(&self) -> anyhow::Result<Vec<PricingConfig>>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}

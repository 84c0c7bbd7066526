//! Clap-free settings for the quote and edit pipelines.

use camino::Utf8PathBuf;
use estimator_domain::EditMode;
use estimator_types::pricing::{ConfigOverrides, Confidence, LockState};

/// Settings for the quote pipeline.
#[derive(Debug, Clone)]
pub struct QuoteSettings {
    pub project_path: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,

    /// Replaces the project's own preset id when set.
    pub preset_id: Option<String>,

    /// Layered on top of the project's stored overrides.
    pub overrides: ConfigOverrides,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            project_path: Utf8PathBuf::from("project.json"),
            out_dir: Utf8PathBuf::from("artifacts/estimator"),
            preset_id: None,
            overrides: ConfigOverrides::default(),
        }
    }
}

/// Settings for the edit pipeline. Every field left `None` is untouched.
#[derive(Debug, Clone)]
pub struct EditSettings {
    pub project_path: Utf8PathBuf,
    pub item_id: Option<String>,

    pub resolution: Option<u8>,
    pub confidence: Option<Confidence>,
    pub count: Option<u32>,
    pub count_delta: Option<i64>,
    pub lock: Option<LockState>,

    /// Applied to every stored item, after the per-item edits.
    pub all_locks: Option<LockState>,

    pub mode: EditMode,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            project_path: Utf8PathBuf::from("project.json"),
            item_id: None,
            resolution: None,
            confidence: None,
            count: None,
            count_delta: None,
            lock: None,
            all_locks: None,
            mode: EditMode::default(),
        }
    }
}

impl EditSettings {
    pub fn has_item_edits(&self) -> bool {
        self.resolution.is_some()
            || self.confidence.is_some()
            || self.count.is_some()
            || self.count_delta.is_some()
            || self.lock.is_some()
    }
}

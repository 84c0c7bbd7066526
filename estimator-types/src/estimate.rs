use crate::item::LineItem;
use crate::pricing::ConfigOverrides;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateMeta {
    pub id: String,
    pub title: String,
    pub client_name: String,
    pub currency: String,

    #[serde(rename = "createdAtISO")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAtISO")]
    pub updated_at: DateTime<Utc>,

    pub validity_days: u32,
}

/// Stored line items plus metadata. Auto items are derived, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub meta: EstimateMeta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_id: Option<String>,

    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Estimate {
    pub fn item(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Shared,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub id: String,
    pub name: String,
    pub client_name: String,
    pub currency: String,

    #[serde(rename = "createdAtISO")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAtISO")]
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub status: ProjectStatus,

    pub validity_days: u32,
}

/// An estimate bound to the preset it is priced with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub meta: ProjectMeta,

    /// Baseline preset for this project.
    pub preset_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,

    pub estimate: Estimate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_token: Option<String>,
}

impl Project {
    /// Stamp both the project and its estimate as modified at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.meta.updated_at = now;
        self.estimate.meta.updated_at = now;
    }
}

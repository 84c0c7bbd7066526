use crate::estimate::EstimateMeta;
use crate::pricing::{CohesionTag, LockState, ResolutionLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Priced amount of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub item_id: String,

    /// Base amount, project management excluded.
    pub total: f64,

    pub pm_amount: f64,
}

impl Breakdown {
    pub fn with_pm(&self) -> f64 {
        self.total + self.pm_amount
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Items currently locked as agreed baseline.
    pub truth_items: Vec<Breakdown>,

    /// Items currently in draft.
    pub spec_items: Vec<Breakdown>,

    pub truth_subtotal: f64,
    pub spec_subtotal: f64,

    /// Total if every item were locked (auto items never lock).
    pub grand_total_truth: f64,

    /// Total if every item were in draft.
    pub grand_total_spec: f64,
}

impl Totals {
    /// What the estimate costs right now, whatever the lock states.
    pub fn current_total(&self) -> f64 {
        self.truth_subtotal + self.spec_subtotal
    }

    pub fn breakdown(&self, item_id: &str) -> Option<&Breakdown> {
        self.truth_items
            .iter()
            .chain(self.spec_items.iter())
            .find(|b| b.item_id == item_id)
    }
}

/// One item whose resolution sits below the cohesion floor for its tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohesionMismatch {
    pub item_id: String,
    pub cohesion_tag: CohesionTag,
    pub resolution: ResolutionLevel,
    pub floor: ResolutionLevel,
    pub notches: u8,

    /// Price of the item at its current resolution.
    pub item_base: f64,

    pub debt: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohesionAssessment {
    pub enabled: bool,
    pub max_core_resolution: ResolutionLevel,
    pub core_floor: ResolutionLevel,
    pub utility_floor: ResolutionLevel,

    #[serde(default)]
    pub mismatches: Vec<CohesionMismatch>,

    pub debt_total: f64,
}

/// A priced line as presented to the reader of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub item_id: String,

    #[serde(rename = "type")]
    pub item_type: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub cohesion_tag: CohesionTag,
    pub lock_state: LockState,
    pub resolution: ResolutionLevel,
    pub total: f64,
    pub pm_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub schema: String,
    pub tool: ToolInfo,
    pub estimate: EstimateMeta,
    pub preset_id: String,
    pub currency: String,

    /// sha256 of the canonical JSON of the effective pricing config.
    pub config_fingerprint: String,

    #[serde(default)]
    pub lines: Vec<QuoteLine>,

    pub cohesion: CohesionAssessment,

    pub totals: Totals,
}

impl Quote {
    pub fn new(tool: ToolInfo, estimate: EstimateMeta, preset_id: String, currency: String) -> Self {
        Self {
            schema: crate::schema::ESTIMATOR_QUOTE_V1.to_string(),
            tool,
            estimate,
            preset_id,
            currency,
            config_fingerprint: String::new(),
            lines: vec![],
            cohesion: CohesionAssessment::default(),
            totals: Totals::default(),
        }
    }
}

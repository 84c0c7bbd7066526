use crate::pricing::{CohesionTag, Complexity, Confidence, LockState, ResolutionLevel, UnitType};
use serde::{Deserialize, Serialize};

/// One deliverable of an estimate.
///
/// Every variant shares the fields below; the pricing shape lives in
/// [`ItemKind`], serialized inline with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,

    pub cohesion_tag: CohesionTag,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub lock_state: LockState,

    pub resolution: ResolutionLevel,

    pub confidence: Confidence,

    /// Floor below which `resolution` cannot be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_resolution: Option<ResolutionLevel>,

    #[serde(flatten)]
    pub kind: ItemKind,
}

impl LineItem {
    pub fn is_auto(&self) -> bool {
        matches!(self.kind, ItemKind::Auto { .. })
    }

    /// Complexity used for pricing; only instance items carry one.
    pub fn complexity(&self) -> Complexity {
        match &self.kind {
            ItemKind::Instance { complexity, .. } => *complexity,
            _ => Complexity::Standard,
        }
    }

    pub fn type_label(&self) -> &'static str {
        self.kind.label()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemKind {
    Foundation {
        pricing: Vec<UnitQuantity>,
    },
    Template {
        pricing: Vec<UnitQuantity>,
    },
    Extra {
        pricing: Vec<UnitQuantity>,
    },
    #[serde(rename_all = "camelCase")]
    Instance {
        count: u32,

        #[serde(default)]
        complexity: Complexity,

        pricing: InstancePricing,

        /// Explicit singular/plural titles; inflected from `title` when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        labels: Option<InstanceLabels>,
    },
    /// System-generated; never stored, never edited.
    #[serde(rename_all = "camelCase")]
    Auto {
        derived_from: DerivedFrom,
        amount: f64,
    },
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Foundation { .. } => "foundation",
            ItemKind::Template { .. } => "template",
            ItemKind::Extra { .. } => "extra",
            ItemKind::Instance { .. } => "instance",
            ItemKind::Auto { .. } => "auto",
        }
    }
}

/// Base quantity of one unit type at curve multiplier 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitQuantity {
    pub unit_type: UnitType,
    pub units: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePricing {
    pub unit_type: UnitType,
    pub units_per_instance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceLabels {
    pub singular: String,
    pub plural: String,
}

/// Cohesion inputs an auto item was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFrom {
    pub max_core_resolution: ResolutionLevel,
    pub core_floor: ResolutionLevel,
    pub utility_floor: ResolutionLevel,
}

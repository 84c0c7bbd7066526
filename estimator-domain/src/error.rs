//! Error types for the pricing engine.
//!
//! Two families, both fatal for the computation they occur in:
//! - configuration errors: a table lookup the preset cannot answer
//! - invariant violations: item data that should have been rejected at the boundary

use estimator_types::pricing::{Complexity, Confidence, ResolutionLevel, UnitType};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// An item references a unit type the rate table does not price.
    #[error("item '{item_id}': no unit rate for '{unit_type}'")]
    MissingUnitRate { item_id: String, unit_type: UnitType },

    /// The resolution curve has no multiplier for the item's level.
    #[error("item '{item_id}': resolution curve has no multiplier for level {level}")]
    MissingResolutionFactor {
        item_id: String,
        level: ResolutionLevel,
    },

    #[error("item '{item_id}': no confidence buffer for '{confidence}'")]
    MissingConfidenceBuffer {
        item_id: String,
        confidence: Confidence,
    },

    #[error("item '{item_id}': no complexity multiplier for '{complexity}'")]
    MissingComplexityMultiplier {
        item_id: String,
        complexity: Complexity,
    },

    /// A quantity is negative, NaN or infinite.
    #[error("item '{item_id}': {field} must be a finite, non-negative number (got {value})")]
    InvalidQuantity {
        item_id: String,
        field: &'static str,
        value: f64,
    },

    #[error("item '{item_id}': resolution {level} is outside {min}..={max}", min = ResolutionLevel::MIN, max = ResolutionLevel::MAX)]
    ResolutionOutOfRange {
        item_id: String,
        level: ResolutionLevel,
    },

    #[error("item '{item_id}': resolution {level} is below its minimum {min}")]
    ResolutionBelowMinimum {
        item_id: String,
        level: ResolutionLevel,
        min: ResolutionLevel,
    },

    #[error("duplicate item id '{item_id}'")]
    DuplicateItemId { item_id: String },

    /// The id belongs to a derived item.
    #[error("item '{item_id}': id is reserved for derived items")]
    ReservedItemId { item_id: String },

    /// Auto items are derived on every computation and must not be stored.
    #[error("item '{item_id}': auto items are derived and cannot be stored")]
    StoredAutoItem { item_id: String },
}

impl PricingError {
    /// Id of the item the error is about.
    pub fn item_id(&self) -> &str {
        match self {
            PricingError::MissingUnitRate { item_id, .. }
            | PricingError::MissingResolutionFactor { item_id, .. }
            | PricingError::MissingConfidenceBuffer { item_id, .. }
            | PricingError::MissingComplexityMultiplier { item_id, .. }
            | PricingError::InvalidQuantity { item_id, .. }
            | PricingError::ResolutionOutOfRange { item_id, .. }
            | PricingError::ResolutionBelowMinimum { item_id, .. }
            | PricingError::DuplicateItemId { item_id }
            | PricingError::ReservedItemId { item_id }
            | PricingError::StoredAutoItem { item_id } => item_id,
        }
    }

    /// True when the preset, not the item, needs fixing.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            PricingError::MissingUnitRate { .. }
                | PricingError::MissingResolutionFactor { .. }
                | PricingError::MissingConfidenceBuffer { .. }
                | PricingError::MissingComplexityMultiplier { .. }
        )
    }
}

pub type PricingResult<T> = Result<T, PricingError>;

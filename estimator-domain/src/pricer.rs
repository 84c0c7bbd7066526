//! Monetary total of a single line item.

use crate::error::{PricingError, PricingResult};
use estimator_types::item::{ItemKind, LineItem, UnitQuantity};
use estimator_types::pricing::{PricingConfig, UnitType};

/// Price one item under `config`, project management excluded.
///
/// Each pricing entry contributes
/// `quantity * rate * curve[resolution] * (1 + buffer[confidence]) * complexity`;
/// the item total is their sum. Auto items return their stored amount.
pub fn price(item: &LineItem, config: &PricingConfig) -> PricingResult<f64> {
    match &item.kind {
        ItemKind::Auto { amount, .. } => Ok(*amount),
        ItemKind::Foundation { pricing }
        | ItemKind::Template { pricing }
        | ItemKind::Extra { pricing } => {
            let factor = item_factor(item, config)?;
            pricing.iter().try_fold(0.0, |sum, entry| {
                Ok(sum + entry_amount(item, entry, config)? * factor)
            })
        }
        ItemKind::Instance { count, pricing, .. } => {
            let factor = item_factor(item, config)?;
            let units = checked_quantity(item, "unitsPerInstance", pricing.units_per_instance)?;
            let rate = unit_rate(item, pricing.unit_type, config)?;
            Ok(f64::from(*count) * units * rate * factor)
        }
    }
}

/// Curve, confidence and complexity multipliers shared by every entry.
fn item_factor(item: &LineItem, config: &PricingConfig) -> PricingResult<f64> {
    let curve = config
        .resolution_curve
        .get(&item.resolution)
        .copied()
        .ok_or_else(|| PricingError::MissingResolutionFactor {
            item_id: item.id.clone(),
            level: item.resolution,
        })?;

    let buffer = config
        .confidence_buffer
        .get(&item.confidence)
        .copied()
        .ok_or_else(|| PricingError::MissingConfidenceBuffer {
            item_id: item.id.clone(),
            confidence: item.confidence,
        })?;

    let complexity = item.complexity();
    let multiplier = config
        .complexity_multiplier
        .get(&complexity)
        .copied()
        .ok_or_else(|| PricingError::MissingComplexityMultiplier {
            item_id: item.id.clone(),
            complexity,
        })?;

    Ok(curve * (1.0 + buffer) * multiplier)
}

fn entry_amount(item: &LineItem, entry: &UnitQuantity, config: &PricingConfig) -> PricingResult<f64> {
    let units = checked_quantity(item, "units", entry.units)?;
    let rate = unit_rate(item, entry.unit_type, config)?;
    Ok(units * rate)
}

fn unit_rate(item: &LineItem, unit_type: UnitType, config: &PricingConfig) -> PricingResult<f64> {
    config
        .unit_rates
        .get(&unit_type)
        .copied()
        .ok_or_else(|| PricingError::MissingUnitRate {
            item_id: item.id.clone(),
            unit_type,
        })
}

pub(crate) fn checked_quantity(
    item: &LineItem,
    field: &'static str,
    value: f64,
) -> PricingResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PricingError::InvalidQuantity {
            item_id: item.id.clone(),
            field,
            value,
        })
    }
}

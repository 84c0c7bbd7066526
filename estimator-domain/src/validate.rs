use crate::cohesion::AUTO_DEBT_ITEM_ID;
use crate::error::{PricingError, PricingResult};
use crate::pricer::checked_quantity;
use estimator_types::item::{ItemKind, LineItem};
use estimator_types::pricing::{PricingConfig, ResolutionLevel};
use std::collections::BTreeSet;

/// Boundary checks for stored items, first violation wins.
///
/// Ids must be unique and must not collide with derived item ids, no auto
/// item may be stored, resolutions must be in range and at or above their
/// minimum, quantities must be finite and non-negative, and every
/// referenced unit type must have a rate.
pub fn validate_items(items: &[LineItem], config: &PricingConfig) -> PricingResult<()> {
    let mut seen = BTreeSet::new();

    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(PricingError::DuplicateItemId {
                item_id: item.id.clone(),
            });
        }
        validate_item(item, config)?;
    }

    Ok(())
}

fn validate_item(item: &LineItem, config: &PricingConfig) -> PricingResult<()> {
    if item.is_auto() {
        return Err(PricingError::StoredAutoItem {
            item_id: item.id.clone(),
        });
    }

    if item.id == AUTO_DEBT_ITEM_ID {
        return Err(PricingError::ReservedItemId {
            item_id: item.id.clone(),
        });
    }

    if !item.resolution.is_valid() {
        return Err(PricingError::ResolutionOutOfRange {
            item_id: item.id.clone(),
            level: item.resolution,
        });
    }

    if let Some(min) = item.min_resolution {
        let min = min.max(ResolutionLevel::MIN);
        if item.resolution < min {
            return Err(PricingError::ResolutionBelowMinimum {
                item_id: item.id.clone(),
                level: item.resolution,
                min,
            });
        }
    }

    let entries: Vec<_> = match &item.kind {
        ItemKind::Foundation { pricing }
        | ItemKind::Template { pricing }
        | ItemKind::Extra { pricing } => pricing
            .iter()
            .map(|e| ("units", e.unit_type, e.units))
            .collect(),
        ItemKind::Instance { pricing, .. } => vec![(
            "unitsPerInstance",
            pricing.unit_type,
            pricing.units_per_instance,
        )],
        ItemKind::Auto { .. } => vec![],
    };

    for (field, unit_type, value) in entries {
        checked_quantity(item, field, value)?;
        if !config.unit_rates.contains_key(&unit_type) {
            return Err(PricingError::MissingUnitRate {
                item_id: item.id.clone(),
                unit_type,
            });
        }
    }

    Ok(())
}

//! Cohesion-debt derivation.
//!
//! When core deliverables are finished to a higher resolution than the
//! rest, lagging core and utility items carry "debt": the cost of bringing
//! them up to a floor derived from the best core item. The debt is billed
//! through one synthetic `auto` item.

use crate::error::PricingResult;
use crate::pricer::price;
use estimator_types::item::{DerivedFrom, ItemKind, LineItem};
use estimator_types::pricing::{
    CohesionConfig, CohesionTag, Confidence, DebtPricingMode, LockState, PricingConfig,
    ResolutionLevel,
};
use estimator_types::quote::{CohesionAssessment, CohesionMismatch};
use tracing::debug;

/// Id of the synthetic debt item.
pub const AUTO_DEBT_ITEM_ID: &str = "auto-cohesion-debt";

pub const AUTO_DEBT_TITLE: &str = "Cohesion debt";

/// Compute floors and per-item debt for `items`.
///
/// Auto items are ignored. When cohesion is disabled, or no core item
/// exists, the assessment is empty.
pub fn assess_cohesion(
    items: &[LineItem],
    config: &PricingConfig,
) -> PricingResult<CohesionAssessment> {
    let rules = &config.cohesion;
    if !rules.enabled {
        debug!("cohesion disabled; skipping");
        return Ok(CohesionAssessment::default());
    }

    let Some(max_core) = items
        .iter()
        .filter(|i| !i.is_auto() && i.cohesion_tag == CohesionTag::Core)
        .map(|i| i.resolution)
        .max()
    else {
        debug!("no core items; skipping cohesion");
        return Ok(CohesionAssessment {
            enabled: true,
            core_floor: rules.min_core_floor,
            utility_floor: rules.min_utility_floor,
            ..Default::default()
        });
    };

    let (core_floor, utility_floor) = floors(max_core, rules);

    let mut mismatches = Vec::new();
    for item in items.iter().filter(|i| !i.is_auto()) {
        let floor = match item.cohesion_tag {
            CohesionTag::Core => core_floor,
            CohesionTag::Utility => utility_floor,
            CohesionTag::Optional => continue,
        };
        if item.resolution >= floor {
            continue;
        }

        let notches = floor.get() - item.resolution.get();
        let item_base = price(item, config)?;
        let debt = match rules.debt_pricing_mode {
            DebtPricingMode::ItemBase => {
                f64::from(notches) * rules.debt_factor_per_notch * item_base
            }
        };
        debug!(item = %item.id, %floor, notches, debt, "cohesion mismatch");

        mismatches.push(CohesionMismatch {
            item_id: item.id.clone(),
            cohesion_tag: item.cohesion_tag,
            resolution: item.resolution,
            floor,
            notches,
            item_base,
            debt,
        });
    }

    let debt_total = mismatches.iter().map(|m| m.debt).sum();

    Ok(CohesionAssessment {
        enabled: true,
        max_core_resolution: max_core,
        core_floor,
        utility_floor,
        mismatches,
        debt_total,
    })
}

/// Floors for core and utility items given the best core resolution.
pub fn floors(max_core: ResolutionLevel, rules: &CohesionConfig) -> (ResolutionLevel, ResolutionLevel) {
    let core = max_core
        .saturating_sub(rules.core_floor_delta)
        .max(rules.min_core_floor);
    let utility = max_core
        .saturating_sub(rules.utility_floor_delta)
        .max(rules.min_utility_floor);
    (core, utility)
}

/// Synthetic items for the current state of `items`: at most one debt item.
pub fn derive_auto_items(items: &[LineItem], config: &PricingConfig) -> PricingResult<Vec<LineItem>> {
    let assessment = assess_cohesion(items, config)?;
    Ok(debt_item(&assessment).into_iter().collect())
}

/// The debt line for an assessment, if it carries any debt.
pub fn debt_item(assessment: &CohesionAssessment) -> Option<LineItem> {
    if assessment.debt_total <= 0.0 {
        return None;
    }

    let lagging = assessment.mismatches.len();
    Some(LineItem {
        id: AUTO_DEBT_ITEM_ID.to_string(),
        cohesion_tag: CohesionTag::Utility,
        title: AUTO_DEBT_TITLE.to_string(),
        description: Some(format!(
            "Bringing {lagging} lagging item{} up to the cohesion floor (core {}, utility {})",
            if lagging == 1 { "" } else { "s" },
            assessment.core_floor,
            assessment.utility_floor,
        )),
        lock_state: LockState::Spec,
        resolution: assessment.max_core_resolution,
        confidence: Confidence::High,
        min_resolution: None,
        kind: ItemKind::Auto {
            derived_from: DerivedFrom {
                max_core_resolution: assessment.max_core_resolution,
                core_floor: assessment.core_floor,
                utility_floor: assessment.utility_floor,
            },
            amount: assessment.debt_total,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::studio_eur;
    use crate::test_support::template;
    use estimator_types::pricing::UnitType;
    use pretty_assertions::assert_eq;

    /// Curve 1.0 at level 2 and a 1000 rate make every item's base exactly 1000.
    fn flat_config() -> PricingConfig {
        let mut config = studio_eur();
        config.resolution_curve.insert(ResolutionLevel(2), 1.0);
        config.unit_rates.insert(UnitType::Template, 1000.0);
        config
    }

    #[test]
    fn studio_curve_debt_rises_from_level_one_to_two() {
        let config = studio_eur();
        let debt_at = |level: u8| {
            let items = vec![
                template("li-hero", CohesionTag::Core, 7, &[(UnitType::Template, 1.0)]),
                template("li-lagging", CohesionTag::Core, level, &[(UnitType::Template, 10.0)]),
            ];
            assess_cohesion(&items, &config).expect("assess").debt_total
        };

        // Base 4800 * curve; floor 5.
        let expected = [1152.0, 1296.0, 1152.0, 777.6, 0.0];
        for (level, want) in (1u8..=5).zip(expected) {
            let got = debt_at(level);
            assert!((got - want).abs() < 1e-6, "level {level}: {got} != {want}");
        }
        assert!(debt_at(2) > debt_at(1));
    }

    #[test]
    fn one_notch_below_core_floor_costs_twelve_percent() {
        let items = vec![
            template("li-hero", CohesionTag::Core, 5, &[(UnitType::Template, 1.0)]),
            template("li-lagging", CohesionTag::Core, 2, &[(UnitType::Template, 1.0)]),
        ];

        let assessment = assess_cohesion(&items, &flat_config()).expect("assess");
        assert_eq!(assessment.max_core_resolution, ResolutionLevel(5));
        assert_eq!(assessment.core_floor, ResolutionLevel(3));
        assert_eq!(assessment.mismatches.len(), 1);
        assert_eq!(assessment.mismatches[0].notches, 1);
        assert!((assessment.debt_total - 120.0).abs() < 1e-9);

        let auto = derive_auto_items(&items, &flat_config()).expect("derive");
        assert_eq!(auto.len(), 1);
        let debt = &auto[0];
        assert_eq!(debt.id, AUTO_DEBT_ITEM_ID);
        assert_eq!(debt.cohesion_tag, CohesionTag::Utility);
        assert_eq!(debt.lock_state, LockState::Spec);
        assert_eq!(debt.resolution, ResolutionLevel(5));
        match &debt.kind {
            ItemKind::Auto {
                derived_from,
                amount,
            } => {
                assert_eq!(derived_from.core_floor, ResolutionLevel(3));
                assert_eq!(derived_from.utility_floor, ResolutionLevel(2));
                assert!((amount - 120.0).abs() < 1e-9);
            }
            other => panic!("expected auto item, got {other:?}"),
        }
    }

    #[test]
    fn floors_respect_minimums() {
        let rules = studio_eur().cohesion;
        assert_eq!(
            floors(ResolutionLevel(7), &rules),
            (ResolutionLevel(5), ResolutionLevel(3))
        );
        assert_eq!(
            floors(ResolutionLevel(4), &rules),
            (ResolutionLevel(3), ResolutionLevel(2))
        );
        assert_eq!(
            floors(ResolutionLevel(1), &rules),
            (ResolutionLevel(3), ResolutionLevel(2))
        );
    }

    #[test]
    fn utility_items_use_the_lower_floor_and_optional_items_are_ignored() {
        let items = vec![
            template("li-core", CohesionTag::Core, 7, &[(UnitType::Template, 1.0)]),
            template("li-util", CohesionTag::Utility, 1, &[(UnitType::Template, 1.0)]),
            template("li-opt", CohesionTag::Optional, 1, &[(UnitType::Template, 1.0)]),
        ];

        let assessment = assess_cohesion(&items, &studio_eur()).expect("assess");
        assert_eq!(assessment.utility_floor, ResolutionLevel(3));
        assert_eq!(assessment.mismatches.len(), 1);

        let m = &assessment.mismatches[0];
        assert_eq!(m.item_id, "li-util");
        assert_eq!(m.notches, 2);
        // base at level 1: 480 * 0.5 = 240; debt 2 * 0.12 * 240
        assert!((m.item_base - 240.0).abs() < 1e-9);
        assert!((m.debt - 57.6).abs() < 1e-9);
    }

    #[test]
    fn disabled_cohesion_derives_nothing() {
        let mut config = studio_eur();
        config.cohesion.enabled = false;
        let items = vec![
            template("li-hero", CohesionTag::Core, 7, &[(UnitType::Template, 1.0)]),
            template("li-lagging", CohesionTag::Core, 1, &[(UnitType::Template, 1.0)]),
        ];

        let assessment = assess_cohesion(&items, &config).expect("assess");
        assert!(!assessment.enabled);
        assert!(assessment.mismatches.is_empty());
        assert!(derive_auto_items(&items, &config).expect("derive").is_empty());
    }

    #[test]
    fn no_core_items_means_no_debt() {
        let items = vec![template(
            "li-util",
            CohesionTag::Utility,
            1,
            &[(UnitType::Template, 1.0)],
        )];
        let assessment = assess_cohesion(&items, &studio_eur()).expect("assess");
        assert!(assessment.enabled);
        assert_eq!(assessment.max_core_resolution, ResolutionLevel(0));
        assert_eq!(assessment.debt_total, 0.0);
        assert!(derive_auto_items(&items, &studio_eur()).expect("derive").is_empty());
    }

    #[test]
    fn existing_auto_items_are_ignored() {
        let mut items = vec![
            template("li-hero", CohesionTag::Core, 5, &[(UnitType::Template, 1.0)]),
            template("li-lagging", CohesionTag::Core, 2, &[(UnitType::Template, 1.0)]),
        ];
        let derived = derive_auto_items(&items, &flat_config()).expect("derive");
        items.extend(derived.clone());

        assert_eq!(derive_auto_items(&items, &flat_config()).expect("derive"), derived);
    }

    #[test]
    fn zero_priced_mismatch_emits_no_item() {
        let items = vec![
            template("li-hero", CohesionTag::Core, 5, &[(UnitType::Template, 1.0)]),
            template("li-empty", CohesionTag::Core, 1, &[]),
        ];
        let assessment = assess_cohesion(&items, &studio_eur()).expect("assess");
        assert_eq!(assessment.mismatches.len(), 1);
        assert!(debt_item(&assessment).is_none());
    }
}

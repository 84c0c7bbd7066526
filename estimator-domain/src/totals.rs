use crate::error::PricingResult;
use crate::pricer::price;
use estimator_types::item::LineItem;
use estimator_types::pricing::{LockState, PricingConfig};
use estimator_types::quote::{Breakdown, Totals};

/// Breakdowns, lock-state subtotals and forced-lock grand totals.
///
/// `items` should already include derived auto items. Input order is kept
/// inside each partition. Auto items can never be truth, so they count
/// toward `grand_total_spec` only.
pub fn compute_totals(items: &[LineItem], config: &PricingConfig) -> PricingResult<Totals> {
    let breakdowns = item_breakdowns(items, config)?;
    Ok(partition(items, breakdowns))
}

/// One breakdown per item, in input order.
pub fn item_breakdowns(items: &[LineItem], config: &PricingConfig) -> PricingResult<Vec<Breakdown>> {
    items
        .iter()
        .map(|item| {
            let total = price(item, config)?;
            Ok(Breakdown {
                item_id: item.id.clone(),
                total,
                pm_amount: total * config.pm_percent,
            })
        })
        .collect()
}

/// Fold positional breakdowns into totals; `breakdowns[i]` belongs to `items[i]`.
pub(crate) fn partition(items: &[LineItem], breakdowns: Vec<Breakdown>) -> Totals {
    let mut totals = Totals::default();

    for (item, breakdown) in items.iter().zip(breakdowns) {
        let amount = breakdown.with_pm();

        if !item.is_auto() {
            totals.grand_total_truth += amount;
        }
        totals.grand_total_spec += amount;

        match effective_lock(item) {
            LockState::Truth => {
                totals.truth_subtotal += amount;
                totals.truth_items.push(breakdown);
            }
            LockState::Spec => {
                totals.spec_subtotal += amount;
                totals.spec_items.push(breakdown);
            }
        }
    }

    totals
}

fn effective_lock(item: &LineItem) -> LockState {
    if item.is_auto() {
        LockState::Spec
    } else {
        item.lock_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohesion::derive_auto_items;
    use crate::presets::studio_eur;
    use crate::test_support::{instance, template};
    use estimator_types::pricing::{CohesionTag, Complexity, UnitType};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn worked_example_pm_and_partitions() {
        let mut locked = template(
            "li-template",
            CohesionTag::Core,
            4,
            &[(UnitType::Template, 11.0), (UnitType::Qa, 2.0)],
        );
        locked.lock_state = LockState::Truth;
        let pages = instance("li-pages", 1, 3.2, Complexity::Standard);

        let totals = compute_totals(&[locked, pages], &studio_eur()).expect("totals");

        assert_eq!(totals.truth_items.len(), 1);
        assert_eq!(totals.spec_items.len(), 1);
        let t = &totals.truth_items[0];
        assert!(close(t.total, 7884.0));
        assert!(close(t.pm_amount, 394.2));
        let s = &totals.spec_items[0];
        assert!(close(s.total, 907.2));

        assert!(close(totals.truth_subtotal, 7884.0 * 1.05));
        assert!(close(totals.spec_subtotal, 907.2 * 1.05));
        assert!(close(totals.grand_total_truth, (7884.0 + 907.2) * 1.05));
        assert!(close(totals.grand_total_spec, totals.grand_total_truth));
        assert!(close(totals.current_total(), totals.grand_total_spec));
    }

    #[test]
    fn auto_items_stay_out_of_the_truth_grand_total() {
        let mut hero = template("li-hero", CohesionTag::Core, 7, &[(UnitType::Template, 1.0)]);
        hero.lock_state = LockState::Truth;
        let lagging = template("li-lagging", CohesionTag::Core, 3, &[(UnitType::Template, 1.0)]);

        let config = studio_eur();
        let mut items = vec![hero, lagging];
        let auto = derive_auto_items(&items, &config).expect("derive");
        assert_eq!(auto.len(), 1);
        items.extend(auto);

        let totals = compute_totals(&items, &config).expect("totals");
        let debt = totals
            .breakdown(crate::cohesion::AUTO_DEBT_ITEM_ID)
            .expect("debt breakdown")
            .with_pm();

        assert_eq!(totals.spec_items.len(), 2);
        assert!(close(
            totals.grand_total_spec - totals.grand_total_truth,
            debt
        ));
    }

    #[test]
    fn breakdowns_follow_input_order() {
        let items = vec![
            template("li-b", CohesionTag::Core, 4, &[(UnitType::Template, 2.0)]),
            template("li-a", CohesionTag::Core, 4, &[(UnitType::Template, 1.0)]),
        ];
        let breakdowns = item_breakdowns(&items, &studio_eur()).expect("breakdowns");

        let ids: Vec<_> = breakdowns.iter().map(|b| b.item_id.as_str()).collect();
        assert_eq!(ids, ["li-b", "li-a"]);
        assert!(close(breakdowns[0].total, 2.0 * breakdowns[1].total));
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(
            compute_totals(&[], &studio_eur()).expect("totals"),
            Totals::default()
        );
    }
}

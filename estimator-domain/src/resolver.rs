//! Preset + overrides -> effective pricing config.

use estimator_types::pricing::{CohesionConfig, CohesionOverrides, ConfigOverrides, PricingConfig};

/// Merge a base preset with per-project overrides.
///
/// `pm_percent` is replaced, `unit_rates` merge key-wise and `cohesion`
/// merges field-wise. Values are not validated.
pub fn effective_config(base: &PricingConfig, overrides: &ConfigOverrides) -> PricingConfig {
    let mut unit_rates = base.unit_rates.clone();
    if let Some(rates) = &overrides.unit_rates {
        unit_rates.extend(rates.iter().map(|(k, v)| (*k, *v)));
    }

    let cohesion = match &overrides.cohesion {
        Some(c) => merge_cohesion(&base.cohesion, c),
        None => base.cohesion.clone(),
    };

    PricingConfig {
        pm_percent: overrides.pm_percent.unwrap_or(base.pm_percent),
        unit_rates,
        cohesion,
        ..base.clone()
    }
}

fn merge_cohesion(base: &CohesionConfig, o: &CohesionOverrides) -> CohesionConfig {
    CohesionConfig {
        enabled: o.enabled.unwrap_or(base.enabled),
        core_floor_delta: o.core_floor_delta.unwrap_or(base.core_floor_delta),
        utility_floor_delta: o.utility_floor_delta.unwrap_or(base.utility_floor_delta),
        min_core_floor: o.min_core_floor.unwrap_or(base.min_core_floor),
        min_utility_floor: o.min_utility_floor.unwrap_or(base.min_utility_floor),
        debt_factor_per_notch: o.debt_factor_per_notch.unwrap_or(base.debt_factor_per_notch),
        debt_pricing_mode: o.debt_pricing_mode.unwrap_or(base.debt_pricing_mode),
    }
}

/// Stack two override records; values in `top` win.
pub fn layer_overrides(base: &ConfigOverrides, top: &ConfigOverrides) -> ConfigOverrides {
    let unit_rates = match (&base.unit_rates, &top.unit_rates) {
        (Some(b), Some(t)) => {
            let mut merged = b.clone();
            merged.extend(t.iter().map(|(k, v)| (*k, *v)));
            Some(merged)
        }
        (b, t) => t.clone().or_else(|| b.clone()),
    };

    let cohesion = match (&base.cohesion, &top.cohesion) {
        (Some(b), Some(t)) => Some(CohesionOverrides {
            enabled: t.enabled.or(b.enabled),
            core_floor_delta: t.core_floor_delta.or(b.core_floor_delta),
            utility_floor_delta: t.utility_floor_delta.or(b.utility_floor_delta),
            min_core_floor: t.min_core_floor.or(b.min_core_floor),
            min_utility_floor: t.min_utility_floor.or(b.min_utility_floor),
            debt_factor_per_notch: t.debt_factor_per_notch.or(b.debt_factor_per_notch),
            debt_pricing_mode: t.debt_pricing_mode.or(b.debt_pricing_mode),
        }),
        (b, t) => t.clone().or_else(|| b.clone()),
    };

    ConfigOverrides {
        pm_percent: top.pm_percent.or(base.pm_percent),
        unit_rates,
        cohesion,
    }
}

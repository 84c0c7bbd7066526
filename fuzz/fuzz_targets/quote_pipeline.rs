#![no_main]

//! Fuzz target for the validate -> cohesion -> totals pipeline.
//!
//! Items are built from structured input so most of them get past
//! deserialization and exercise pricing and debt derivation.

use chrono::{TimeZone, Utc};
use estimator_domain::{Quoter, studio_eur};
use estimator_types::estimate::{Estimate, EstimateMeta};
use estimator_types::item::{InstancePricing, ItemKind, LineItem, UnitQuantity};
use estimator_types::pricing::{
    CohesionTag, Complexity, Confidence, LockState, ResolutionLevel, UnitType,
};
use estimator_types::quote::ToolInfo;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, arbitrary::Arbitrary)]
struct PipelineInput {
    pm_percent: f64,
    delta: (u8, u8),
    items: Vec<FuzzItem>,
}

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzItem {
    tag: u8,
    resolution: u8,
    min_resolution: Option<u8>,
    locked: bool,
    confidence: u8,
    shape: Shape,
}

#[derive(Debug, arbitrary::Arbitrary)]
enum Shape {
    Units(Vec<(u8, f64)>),
    Instance { count: u32, units: f64, complexity: u8 },
}

fn pick<T: Copy>(all: &[T], n: u8) -> T {
    all[usize::from(n) % all.len()]
}

fuzz_target!(|input: PipelineInput| {
    let mut config = studio_eur();
    config.pm_percent = input.pm_percent;
    config.cohesion.core_floor_delta = input.delta.0;
    config.cohesion.utility_floor_delta = input.delta.1;

    let items = input
        .items
        .into_iter()
        .take(64)
        .enumerate()
        .map(|(n, item)| LineItem {
            id: format!("li-{n}"),
            cohesion_tag: pick(CohesionTag::ALL, item.tag),
            title: format!("Item {n}"),
            description: None,
            lock_state: if item.locked { LockState::Truth } else { LockState::Spec },
            resolution: ResolutionLevel(item.resolution),
            confidence: pick(Confidence::ALL, item.confidence),
            min_resolution: item.min_resolution.map(ResolutionLevel),
            kind: match item.shape {
                Shape::Units(entries) => ItemKind::Template {
                    pricing: entries
                        .into_iter()
                        .map(|(unit, units)| UnitQuantity {
                            unit_type: pick(UnitType::ALL, unit),
                            units,
                        })
                        .collect(),
                },
                Shape::Instance {
                    count,
                    units,
                    complexity,
                } => ItemKind::Instance {
                    count,
                    complexity: pick(Complexity::ALL, complexity),
                    pricing: InstancePricing {
                        unit_type: UnitType::PageInstance,
                        units_per_instance: units,
                    },
                    labels: None,
                },
            },
        })
        .collect();

    let now = Utc.timestamp_opt(0, 0).single().unwrap_or_default();
    let estimate = Estimate {
        meta: EstimateMeta {
            id: "est-fuzz".to_string(),
            title: "Fuzz".to_string(),
            client_name: "Fuzz".to_string(),
            currency: "EUR".to_string(),
            created_at: now,
            updated_at: now,
            validity_days: 14,
        },
        preset_id: None,
        items,
    };

    let tool = ToolInfo {
        name: "fuzz".to_string(),
        version: None,
    };
    if let Ok(quote) = Quoter::new(config).quote(&estimate, tool) {
        let _ = serde_json::to_string(&quote);
    }
});

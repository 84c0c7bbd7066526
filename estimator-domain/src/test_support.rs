//! Item builders shared by the unit tests.

use estimator_types::item::{InstancePricing, ItemKind, LineItem, UnitQuantity};
use estimator_types::pricing::{
    CohesionTag, Complexity, Confidence, LockState, ResolutionLevel, UnitType,
};

pub(crate) fn template(
    id: &str,
    tag: CohesionTag,
    resolution: u8,
    pricing: &[(UnitType, f64)],
) -> LineItem {
    LineItem {
        id: id.to_string(),
        cohesion_tag: tag,
        title: format!("Item {id}"),
        description: None,
        lock_state: LockState::Spec,
        resolution: ResolutionLevel(resolution),
        confidence: Confidence::High,
        min_resolution: None,
        kind: ItemKind::Template {
            pricing: pricing
                .iter()
                .map(|(unit_type, units)| UnitQuantity {
                    unit_type: *unit_type,
                    units: *units,
                })
                .collect(),
        },
    }
}

pub(crate) fn instance(id: &str, count: u32, units: f64, complexity: Complexity) -> LineItem {
    LineItem {
        id: id.to_string(),
        cohesion_tag: CohesionTag::Utility,
        title: "Template Instances".to_string(),
        description: Some("Secondary template instances.".to_string()),
        lock_state: LockState::Spec,
        resolution: ResolutionLevel(4),
        confidence: Confidence::High,
        min_resolution: None,
        kind: ItemKind::Instance {
            count,
            complexity,
            pricing: InstancePricing {
                unit_type: UnitType::PageInstance,
                units_per_instance: units,
            },
            labels: None,
        },
    }
}

//! Built-in presets and the demo estimate.

use chrono::{DateTime, Utc};
use estimator_types::estimate::{Estimate, EstimateMeta, Project, ProjectMeta, ProjectStatus};
use estimator_types::item::{InstancePricing, ItemKind, LineItem, UnitQuantity};
use estimator_types::pricing::{
    CohesionConfig, CohesionTag, Complexity, Confidence, DebtPricingMode, LockState,
    PricingConfig, ResolutionLevel, UnitType,
};
use std::collections::BTreeMap;

pub const STUDIO_EUR_ID: &str = "preset-studio-eur-v1";

pub const DEMO_ESTIMATE_ID: &str = "est-pitch-client-0002";

/// The studio's default EUR rate card.
pub fn studio_eur() -> PricingConfig {
    PricingConfig {
        id: STUDIO_EUR_ID.to_string(),
        label: "Studio Default (EUR)".to_string(),
        currency: "EUR".to_string(),
        pm_percent: 0.05,
        resolution_curve: [0.5, 0.75, 1.0, 1.35, 1.8, 2.5, 3.3]
            .into_iter()
            .zip(ResolutionLevel::all())
            .map(|(factor, level)| (level, factor))
            .collect(),
        confidence_buffer: BTreeMap::from([
            (Confidence::High, 0.0),
            (Confidence::Medium, 0.08),
            (Confidence::Low, 0.18),
        ]),
        complexity_multiplier: BTreeMap::from([
            (Complexity::Simple, 0.75),
            (Complexity::Standard, 1.0),
            (Complexity::Complex, 1.35),
        ]),
        unit_rates: BTreeMap::from([
            (UnitType::System, 520.0),
            (UnitType::Template, 480.0),
            (UnitType::PageInstance, 210.0),
            (UnitType::Integration, 560.0),
            (UnitType::Content, 160.0),
            (UnitType::Motion, 540.0),
            (UnitType::Qa, 280.0),
        ]),
        cohesion: CohesionConfig {
            enabled: true,
            core_floor_delta: 2,
            utility_floor_delta: 4,
            min_core_floor: ResolutionLevel(3),
            min_utility_floor: ResolutionLevel(2),
            debt_factor_per_notch: 0.12,
            debt_pricing_mode: DebtPricingMode::ItemBase,
        },
    }
}

pub fn builtin_presets() -> Vec<PricingConfig> {
    vec![studio_eur()]
}

pub fn find_preset(id: &str) -> Option<PricingConfig> {
    builtin_presets().into_iter().find(|p| p.id == id)
}

/// Marketing site with a component library and five page templates.
pub fn demo_estimate(now: DateTime<Utc>) -> Estimate {
    use CohesionTag::{Core, Utility};
    use UnitType::{Qa, System, Template};

    let per_page = "Desktop + mobile at the selected Resolution.";

    let mut pages: Vec<LineItem> = [
        ("li-template-page-01", Core, "Hero Template 1", 11.0, 2.0),
        ("li-template-page-02", Core, "Hero Template 2", 11.0, 1.0),
        ("li-template-page-03", Core, "Hero Template 3", 10.0, 1.0),
        ("li-template-page-04", Utility, "Key Template 4", 10.0, 1.0),
        ("li-template-page-05", Utility, "Key Template 5", 10.0, 0.0),
    ]
    .into_iter()
    .map(|(id, tag, title, template, qa)| {
        let mut item = unit_item(
            id,
            tag,
            title,
            per_page,
            ItemKind::Template {
                pricing: units(&[(Template, template), (Qa, qa)]),
            },
        );
        item.min_resolution = Some(ResolutionLevel(3));
        item
    })
    .collect();

    let mut instances = unit_item(
        "li-instance-page-01-b",
        Utility,
        "Template Instances",
        "Secondary template instances.",
        ItemKind::Instance {
            count: 1,
            complexity: Complexity::Standard,
            pricing: InstancePricing {
                unit_type: UnitType::PageInstance,
                units_per_instance: 3.2,
            },
            labels: None,
        },
    );
    instances.min_resolution = Some(ResolutionLevel(3));

    let mut items = vec![
        unit_item(
            "li-concept-direction",
            Core,
            "Visual Concept Direction",
            "Direction-setting route and design direction.",
            ItemKind::Extra {
                pricing: units(&[(Template, 8.0), (Qa, 0.0)]),
            },
        ),
        unit_item(
            "li-component-library-figma",
            Core,
            "Component Library (Figma)",
            "Modular component library, states, and breakpoints.",
            ItemKind::Foundation {
                pricing: units(&[(System, 14.0), (Qa, 2.0)]),
            },
        ),
    ];
    items.append(&mut pages);
    items.push(instances);
    items.push(unit_item(
        "li-interactive-prototype",
        Utility,
        "Interactive Prototype",
        "Prototype flows and interactions across page types.",
        ItemKind::Extra {
            pricing: units(&[(Template, 8.0), (Qa, 0.0)]),
        },
    ));
    items.push(unit_item(
        "li-figma-annotation-pass",
        Utility,
        "Annotated Figma File",
        "Components, breakpoints, variants, and handover notes.",
        ItemKind::Extra {
            pricing: units(&[(Qa, 0.0), (System, 1.0)]),
        },
    ));

    Estimate {
        meta: EstimateMeta {
            id: DEMO_ESTIMATE_ID.to_string(),
            title: "Website + Design System + 5 Page Types (2 Audiences)".to_string(),
            client_name: "Demo Client".to_string(),
            currency: "EUR".to_string(),
            created_at: now,
            updated_at: now,
            validity_days: 14,
        },
        preset_id: Some(STUDIO_EUR_ID.to_string()),
        items,
    }
}

/// The demo estimate wrapped in a draft project on the studio preset.
pub fn demo_project(now: DateTime<Utc>, project_id: impl Into<String>) -> Project {
    let estimate = demo_estimate(now);
    Project {
        meta: ProjectMeta {
            id: project_id.into(),
            name: estimate.meta.title.clone(),
            client_name: estimate.meta.client_name.clone(),
            currency: estimate.meta.currency.clone(),
            created_at: now,
            updated_at: now,
            status: ProjectStatus::Draft,
            validity_days: estimate.meta.validity_days,
        },
        preset_id: STUDIO_EUR_ID.to_string(),
        overrides: None,
        estimate,
        share_token: None,
    }
}

fn unit_item(id: &str, tag: CohesionTag, title: &str, description: &str, kind: ItemKind) -> LineItem {
    LineItem {
        id: id.to_string(),
        cohesion_tag: tag,
        title: title.to_string(),
        description: Some(description.to_string()),
        lock_state: LockState::Spec,
        resolution: ResolutionLevel(4),
        confidence: Confidence::High,
        min_resolution: None,
        kind,
    }
}

fn units(entries: &[(UnitType, f64)]) -> Vec<UnitQuantity> {
    entries
        .iter()
        .map(|&(unit_type, units)| UnitQuantity { unit_type, units })
        .collect()
}

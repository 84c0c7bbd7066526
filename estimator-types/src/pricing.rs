use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseVariantError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseVariantError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| ParseVariantError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

wire_enum! {
    /// Category of billable work, each with its own rate.
    UnitType ("unit type") {
        System => "system",
        Template => "template",
        PageInstance => "pageInstance",
        Integration => "integration",
        Content => "content",
        Motion => "motion",
        Qa => "qa",
    }
}

wire_enum! {
    /// How sure the studio is about the scope of an item.
    Confidence ("confidence") {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

wire_enum! {
    Complexity ("complexity") {
        Simple => "simple",
        Standard => "standard",
        Complex => "complex",
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Complexity::Standard
    }
}

wire_enum! {
    /// Importance of a deliverable for cohesion checks.
    CohesionTag ("cohesion tag") {
        Core => "core",
        Utility => "utility",
        Optional => "optional",
    }
}

wire_enum! {
    /// Agreed baseline (`truth`) vs draft (`spec`).
    LockState ("lock state") {
        Truth => "truth",
        Spec => "spec",
    }
}

wire_enum! {
    /// How cohesion debt is priced.
    ///
    /// - itemBase: a fraction of the lagging item's own base price, per notch
    DebtPricingMode ("debt pricing mode") {
        ItemBase => "itemBase",
    }
}

impl Default for DebtPricingMode {
    fn default() -> Self {
        DebtPricingMode::ItemBase
    }
}

/// Finish/coverage/QA depth of a deliverable, 1 (rough) to 7 (flagship).
///
/// Deserializes from JSON numbers as well as from string map keys, so a
/// resolution curve can be written as `{ "1": 0.5, "2": 0.75 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResolutionLevel(pub u8);

impl ResolutionLevel {
    pub const MIN: ResolutionLevel = ResolutionLevel(1);
    pub const MAX: ResolutionLevel = ResolutionLevel(7);

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self)
    }

    pub fn saturating_sub(self, notches: u8) -> Self {
        Self(self.0.saturating_sub(notches))
    }

    /// All valid levels, lowest first.
    pub fn all() -> impl Iterator<Item = ResolutionLevel> {
        (Self::MIN.0..=Self::MAX.0).map(ResolutionLevel)
    }
}

impl fmt::Display for ResolutionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ResolutionLevel {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u8>().map(ResolutionLevel)
    }
}

impl<'de> Deserialize<'de> for ResolutionLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = ResolutionLevel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a resolution level between 0 and 255")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u8::try_from(v)
                    .map(ResolutionLevel)
                    .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u8::try_from(v)
                    .map(ResolutionLevel)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse::<ResolutionLevel>()
                    .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

/// A pricing preset. Once resolved against project overrides it is the
/// effective configuration every computation runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    pub id: String,

    #[serde(default)]
    pub label: String,

    pub currency: String,

    /// Project-management surcharge applied to every item's base price.
    pub pm_percent: f64,

    pub resolution_curve: BTreeMap<ResolutionLevel, f64>,

    pub confidence_buffer: BTreeMap<Confidence, f64>,

    pub complexity_multiplier: BTreeMap<Complexity, f64>,

    pub unit_rates: BTreeMap<UnitType, f64>,

    pub cohesion: CohesionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohesionConfig {
    pub enabled: bool,
    pub core_floor_delta: u8,
    pub utility_floor_delta: u8,
    pub min_core_floor: ResolutionLevel,
    pub min_utility_floor: ResolutionLevel,
    pub debt_factor_per_notch: f64,

    #[serde(default)]
    pub debt_pricing_mode: DebtPricingMode,
}

/// Per-project overrides. Only the keys present override the preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_rates: Option<BTreeMap<UnitType, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cohesion: Option<CohesionOverrides>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.pm_percent.is_none()
            && self.unit_rates.as_ref().is_none_or(|r| r.is_empty())
            && self.cohesion.as_ref().is_none_or(|c| c.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohesionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_floor_delta: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utility_floor_delta: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_core_floor: Option<ResolutionLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_utility_floor: Option<ResolutionLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_factor_per_notch: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_pricing_mode: Option<DebtPricingMode>,
}

impl CohesionOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

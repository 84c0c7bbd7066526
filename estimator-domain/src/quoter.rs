use crate::cohesion::{assess_cohesion, debt_item};
use crate::error::PricingResult;
use crate::rename::resolve_rename;
use crate::totals::{item_breakdowns, partition};
use crate::validate::validate_items;
use estimator_types::estimate::Estimate;
use estimator_types::item::LineItem;
use estimator_types::pricing::PricingConfig;
use estimator_types::quote::{Quote, QuoteLine, ToolInfo};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Prices whole estimates against one effective config.
#[derive(Debug, Clone)]
pub struct Quoter {
    config: PricingConfig,
}

impl Quoter {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Validate, derive debt, price and label every line of `estimate`.
    pub fn quote(&self, estimate: &Estimate, tool: ToolInfo) -> PricingResult<Quote> {
        validate_items(&estimate.items, &self.config)?;

        let cohesion = assess_cohesion(&estimate.items, &self.config)?;
        let mut items = estimate.items.clone();
        items.extend(debt_item(&cohesion));

        let breakdowns = item_breakdowns(&items, &self.config)?;

        let lines = items
            .iter()
            .zip(&breakdowns)
            .map(|(item, breakdown)| {
                let label = resolve_rename(item);
                QuoteLine {
                    item_id: item.id.clone(),
                    item_type: item.type_label().to_string(),
                    title: label.title,
                    description: label.description,
                    cohesion_tag: item.cohesion_tag,
                    lock_state: item.lock_state,
                    resolution: item.resolution,
                    total: breakdown.total,
                    pm_amount: breakdown.pm_amount,
                }
            })
            .collect();
        let totals = partition(&items, breakdowns);

        let mut quote = Quote::new(
            tool,
            estimate.meta.clone(),
            self.config.id.clone(),
            self.config.currency.clone(),
        );
        quote.config_fingerprint = config_fingerprint(&self.config);
        quote.lines = lines;
        quote.cohesion = cohesion;
        quote.totals = totals;

        debug!(
            estimate = %estimate.meta.id,
            lines = quote.lines.len(),
            total = quote.totals.current_total(),
            "quoted estimate"
        );
        Ok(quote)
    }
}

/// Stored items followed by the ones derived from them.
pub fn with_auto_items(items: &[LineItem], config: &PricingConfig) -> PricingResult<Vec<LineItem>> {
    let stored = items.iter().filter(|i| !i.is_auto());
    let mut out: Vec<LineItem> = stored.cloned().collect();
    let derived = crate::cohesion::derive_auto_items(&out, config)?;
    out.extend(derived);
    Ok(out)
}

/// sha256 over the canonical JSON of `config`.
pub fn config_fingerprint(config: &PricingConfig) -> String {
    let value = serde_json::to_value(config).unwrap_or(serde_json::Value::Null);
    let canonical = canonicalize_json(&value);
    let s = serde_json::to_string(&canonical).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

fn canonicalize_json(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize_json(v)))
                    .collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(canonicalize_json).collect())
        }
        other => other.clone(),
    }
}

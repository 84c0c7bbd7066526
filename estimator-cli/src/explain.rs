//! Plain-text rendering for quotes, cohesion assessments and presets.

use estimator_types::pricing::PricingConfig;
use estimator_types::quote::{CohesionAssessment, Quote};

const RULE: &str =
    "--------------------------------------------------------------------------------";

fn money(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

/// Join rendered lines, each terminated by a newline.
fn finish(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

/// One line per priced item followed by the totals.
pub fn render_quote_summary(quote: &Quote) -> String {
    let currency = quote.currency.as_str();
    let totals = &quote.totals;

    let mut lines = vec![
        format!("QUOTE: {}", quote.estimate.title),
        format!("Client:  {}", quote.estimate.client_name),
        format!("Preset:  {}", quote.preset_id),
        RULE.to_string(),
        format!(
            "  {:<36} {:<6} {:>3} {:>18}",
            "ITEM", "LOCK", "RES", "TOTAL (INCL. PM)"
        ),
    ];
    lines.extend(quote.lines.iter().map(|line| {
        format!(
            "  {:<36} {:<6} {:>3} {:>18}",
            truncate(&line.title, 36),
            line.lock_state,
            line.resolution,
            money(line.total + line.pm_amount, currency)
        )
    }));
    lines.push(RULE.to_string());

    lines.push(format!("  Locked (truth):    {}", money(totals.truth_subtotal, currency)));
    lines.push(format!("  Draft (spec):      {}", money(totals.spec_subtotal, currency)));
    lines.push(format!("  Current total:     {}", money(totals.current_total(), currency)));
    lines.push(format!("  If all locked:     {}", money(totals.grand_total_truth, currency)));
    lines.push(format!("  If all draft:      {}", money(totals.grand_total_spec, currency)));
    if quote.cohesion.debt_total > 0.0 {
        lines.push(format!(
            "  Cohesion debt:     {} ({} lagging item(s); run 'estimator explain')",
            money(quote.cohesion.debt_total, currency),
            quote.cohesion.mismatches.len()
        ));
    }
    finish(lines)
}

/// Floors and per-item debt, the way `estimator explain` prints them.
pub fn render_cohesion(assessment: &CohesionAssessment, currency: &str) -> String {
    let mut lines = vec!["COHESION".to_string(), RULE.to_string()];

    if !assessment.enabled {
        lines.push("Cohesion checks are disabled for this preset.".to_string());
        return finish(lines);
    }
    if assessment.max_core_resolution.get() == 0 {
        lines.push("No core items; nothing to compare against.".to_string());
        return finish(lines);
    }

    lines.push(format!("Highest core resolution: {}", assessment.max_core_resolution));
    lines.push(format!("Core floor:              {}", assessment.core_floor));
    lines.push(format!("Utility floor:           {}", assessment.utility_floor));
    lines.push(String::new());

    if assessment.mismatches.is_empty() {
        lines.push("All core and utility items meet their floor. No debt.".to_string());
        return finish(lines);
    }

    lines.push(format!(
        "  {:<30} {:<8} {:>3} {:>5} {:>7} {:>16}",
        "ITEM", "TAG", "RES", "FLOOR", "NOTCHES", "DEBT"
    ));
    lines.extend(assessment.mismatches.iter().map(|m| {
        format!(
            "  {:<30} {:<8} {:>3} {:>5} {:>7} {:>16}",
            truncate(&m.item_id, 30),
            m.cohesion_tag,
            m.resolution,
            m.floor,
            m.notches,
            money(m.debt, currency)
        )
    }));
    lines.push(String::new());
    lines.push(format!("Total debt: {}", money(assessment.debt_total, currency)));
    finish(lines)
}

pub fn render_presets(presets: &[PricingConfig]) -> String {
    let mut lines = vec![
        "Available presets:".to_string(),
        String::new(),
        format!("  {:<28} {:<8} {:>6} LABEL", "ID", "CURRENCY", "PM %"),
        format!("  {:<28} {:<8} {:>6} -----", "--", "--------", "----"),
    ];
    lines.extend(presets.iter().map(|preset| {
        format!(
            "  {:<28} {:<8} {:>6.1} {}",
            preset.id,
            preset.currency,
            preset.pm_percent * 100.0,
            preset.label
        )
    }));
    finish(lines)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(width.saturating_sub(3)).collect();
        t.push_str("...");
        t
    }
}

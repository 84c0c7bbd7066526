//! BDD harness (cucumber-rs).
//!
//! Scenario tests drive the `estimator` binary against temp project files and
//! live here so the production crates stay free of cucumber.

use estimator_types::quote::Quote;

/// Line total (incl. PM) for `item_id`, if the quote has such a line.
pub fn line_total(quote: &Quote, item_id: &str) -> Option<f64> {
    quote
        .lines
        .iter()
        .find(|l| l.item_id == item_id)
        .map(|l| l.total + l.pm_amount)
}

/// Tolerant money comparison used by the step assertions.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[cfg(test)]
mod tests {
    use super::approx_eq;

    #[test]
    fn approx_eq_tolerates_float_noise() {
        assert!(approx_eq(0.1 + 0.2, 0.3));
        assert!(!approx_eq(1.0, 1.01));
    }
}

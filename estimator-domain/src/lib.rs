//! Domain logic: turn line items + a pricing preset into a priced quote.
//!
//! This crate owns *how much* and *why*: pricing, cohesion debt, totals and
//! display labels. It does no I/O; loading projects and writing quotes is
//! the `estimator-core` crate's job.

mod cohesion;
mod editing;
mod error;
mod presets;
mod pricer;
mod quoter;
mod rename;
mod resolver;
mod totals;
mod validate;

#[cfg(test)]
mod test_support;

pub use cohesion::{
    AUTO_DEBT_ITEM_ID, AUTO_DEBT_TITLE, assess_cohesion, debt_item, derive_auto_items, floors,
};
pub use editing::{
    EditMode, adjust_count, set_all_locks, set_confidence, set_count, set_lock, set_resolution,
    toggle_lock,
};
pub use error::{PricingError, PricingResult};
pub use presets::{
    DEMO_ESTIMATE_ID, STUDIO_EUR_ID, builtin_presets, demo_estimate, demo_project, find_preset,
    studio_eur,
};
pub use pricer::price;
pub use quoter::{Quoter, config_fingerprint, with_auto_items};
pub use rename::{DisplayLabel, resolve_rename};
pub use resolver::{effective_config, layer_overrides};
pub use totals::{compute_totals, item_breakdowns};
pub use validate::validate_items;

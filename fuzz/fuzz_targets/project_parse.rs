#![no_main]

//! Fuzz target for project.json parsing.
//!
//! Arbitrary bytes are parsed as a project; anything that parses is quoted
//! against the studio preset. Neither step may panic.

use estimator_domain::{Quoter, studio_eur};
use estimator_types::estimate::Project;
use estimator_types::quote::ToolInfo;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = serde_json::from_str::<estimator_types::pricing::PricingConfig>(s);
    let _ = serde_json::from_str::<estimator_types::pricing::ConfigOverrides>(s);

    if let Ok(project) = serde_json::from_str::<Project>(s) {
        let _ = serde_json::to_string(&project);
        let tool = ToolInfo {
            name: "fuzz".to_string(),
            version: None,
        };
        let _ = Quoter::new(studio_eur()).quote(&project.estimate, tool);
    }
});

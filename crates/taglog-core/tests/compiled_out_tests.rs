#![cfg(not(all(feature = "capture", any(debug_assertions, feature = "release-capture"))))]
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::quiet_registry;
use taglog_core::{tag, tag_error, ExportPolicy, Level};

#[test]
fn test_registry_is_inert() {
    let registry = quiet_registry();

    registry.tag("inert", "x");
    registry.append("inert", "bad", Level::Critical);

    assert!(!taglog_core::CAPTURE_ENABLED);
    assert!(!registry.has_tag("inert"));
    assert_eq!(registry.entry_count("inert"), 0);
    assert!(registry.export("inert", ExportPolicy::always()).is_none());
    assert!(registry.export_all_default().is_empty());
}

#[test]
fn test_global_macros_are_inert() {
    tag!("inert-global", "x");
    tag_error!("inert-global", "failed", "disk full");

    let global = taglog_core::global();
    assert!(!global.has_errors("inert-global"));
    assert!(global.tag_names().is_empty());
    assert!(global.export("inert-global", ExportPolicy::always()).is_none());
}

//! taglog core - tagged log aggregation with conditional export
//!
//! Callers group related log events under a named tag. Each append records
//! the caller's location (and, for error levels, a call stack) and the
//! accumulated entries are later rendered into a Markdown report, or
//! discarded, under an export policy.
//!
//! This crate provides:
//! - `TagRegistry` with append, query, clear and export operations
//! - Call-site resolution from structured frames or raw stack text
//! - Value formatting for scalars, sequences and mappings
//! - A deterministic Markdown reporter
//! - The `tracing`-based logging facility and its test capture mode
//!
//! # Example
//!
//! ```
//! use taglog_core::{Capture, ExportPolicy, Level, TagRegistry};
//!
//! let registry = TagRegistry::new();
//! registry.tag("auth", "start");
//! registry.append("auth", "fail", Capture::new(Level::Error).error("boom"));
//!
//! let report = registry.export("auth", ExportPolicy::only_on_error());
//! assert_eq!(report.is_some(), taglog_core::CAPTURE_ENABLED);
//! if let Some(report) = report {
//!     assert!(report.contains("- **Errors:** 1"));
//! }
//! assert_eq!(registry.entry_count("auth"), 0);
//! ```
//!
//! # Capture in release builds
//!
//! Tag storage is compiled in only with the `capture` feature (on by default)
//! and either debug assertions or the `release-capture` feature. Otherwise
//! appends record nothing, queries report empty tags and export returns
//! `None`.

mod buckets;

pub mod callsite;
pub mod config;
pub mod display;
pub mod entry;
pub mod errors;
pub mod export;
pub mod logging_facility;
pub mod registry;
pub mod render;
pub mod stack;
pub mod value;

pub use taglog_core_types as types;
pub use taglog_core_types::{Level, Location};

// Re-export commonly used types
pub use callsite::{CallSiteResolver, Frame, FrameSource};
pub use config::{ExportPolicy, TagLogConfig};
pub use entry::LogEntry;
pub use errors::{ErrorKind, Result, TagLogError};
pub use registry::{global, Capture, TagRegistry, TagRegistryBuilder};
pub use render::{MarkdownReporter, Reporter};
pub use value::ValueFormatter;

/// Whether tag storage is compiled into this build
pub const CAPTURE_ENABLED: bool = cfg!(all(
    feature = "capture",
    any(debug_assertions, feature = "release-capture")
));

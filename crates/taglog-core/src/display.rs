//! Immediate display of appended entries
//!
//! Every append forwards one line to an [`ImmediateDisplay`]. The default,
//! [`TracingDisplay`], emits a `tracing` event so the line lands wherever the
//! process's subscriber sends it.

use crate::entry::LogEntry;
use taglog_core_types::Level;

/// Receives each entry as soon as it is appended
pub trait ImmediateDisplay: Send + Sync {
    fn show(&self, tag: &str, entry: &LogEntry);
}

/// Emits entries as `tracing` events at the matching level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDisplay;

macro_rules! emit {
    ($level:expr, $tag:expr, $entry:expr) => {
        tracing::event!(
            target: "taglog",
            $level,
            tag = $tag,
            severity = $entry.level().name(),
            location = $entry.location().short(),
            "{}",
            $entry.message()
        )
    };
}

impl ImmediateDisplay for TracingDisplay {
    fn show(&self, tag: &str, entry: &LogEntry) {
        match entry.level() {
            Level::Trace => emit!(tracing::Level::TRACE, tag, entry),
            Level::Debug => emit!(tracing::Level::DEBUG, tag, entry),
            Level::Info => emit!(tracing::Level::INFO, tag, entry),
            Level::Warning => emit!(tracing::Level::WARN, tag, entry),
            Level::Error | Level::Critical => emit!(tracing::Level::ERROR, tag, entry),
        }
    }
}

/// Drops every entry
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

impl ImmediateDisplay for NoDisplay {
    fn show(&self, _tag: &str, _entry: &LogEntry) {}
}

//! Conditional export
//!
//! Export is a consuming read. The policy is evaluated in order:
//!
//! 1. absent or empty tag → nothing happens, no report
//! 2. `export == false` → bucket removed, no report
//! 3. `only_on_error` and no error-level entry → bucket removed, no report
//! 4. otherwise → bucket removed, report rendered and returned
//!
//! The decision and the removal happen under the registry lock; rendering
//! happens after it is released, so a slow reporter never blocks other tags.

use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Instant;

use taglog_core_types::schema::{OUTCOME_ABSENT, OUTCOME_DISCARDED, OUTCOME_RENDERED};

use crate::config::ExportPolicy;
use crate::entry::LogEntry;
use crate::registry::TagRegistry;
use crate::{log_op_end, log_op_start};

/// Why a bucket was discarded without rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The policy disabled export
    ExportDisabled,
    /// Only-on-error was requested and nothing reached error level
    NoErrors,
}

impl DiscardReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardReason::ExportDisabled => "export_disabled",
            DiscardReason::NoErrors => "no_errors",
        }
    }
}

/// Outcome of applying an export policy to a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing to export
    Absent,
    /// Remove without rendering
    Discard(DiscardReason),
    /// Remove and render
    Render,
}

/// Apply `policy` to a bucket's entries
pub fn decide(entries: &[LogEntry], policy: ExportPolicy) -> Verdict {
    if entries.is_empty() {
        Verdict::Absent
    } else if !policy.export {
        Verdict::Discard(DiscardReason::ExportDisabled)
    } else if policy.only_on_error && !entries.iter().any(LogEntry::is_error) {
        Verdict::Discard(DiscardReason::NoErrors)
    } else {
        Verdict::Render
    }
}

impl TagRegistry {
    /// Export `tag` under `policy`
    ///
    /// Returns the rendered report when the policy allows one. The tag is
    /// removed whenever it held entries, rendered or not.
    pub fn export(&self, tag: &str, policy: ExportPolicy) -> Option<String> {
        let started = Instant::now();
        log_op_start!("export", tag = tag);

        let (verdict, entries) = {
            let mut buckets = self.lock();
            let verdict = decide(buckets.get(tag).unwrap_or_default(), policy);
            let entries = match verdict {
                Verdict::Absent => None,
                Verdict::Discard(_) | Verdict::Render => buckets.remove(tag),
            };
            (verdict, entries)
        };

        let report = match (verdict, entries) {
            (Verdict::Render, Some(entries)) => {
                Some(self.reporter().render(tag, &entries, Utc::now()))
            }
            _ => None,
        };

        let outcome = match verdict {
            Verdict::Absent => OUTCOME_ABSENT,
            Verdict::Discard(_) => OUTCOME_DISCARDED,
            Verdict::Render => OUTCOME_RENDERED,
        };
        let reason = match verdict {
            Verdict::Discard(reason) => reason.as_str(),
            _ => "",
        };
        log_op_end!(
            "export",
            duration_ms = started.elapsed().as_millis() as u64,
            tag = tag,
            outcome = outcome,
            reason = reason
        );

        report
    }

    /// Export `tag` under the configured default policy
    pub fn export_default(&self, tag: &str) -> Option<String> {
        self.export(tag, self.default_policy())
    }

    /// Export every tag present right now under `policy`
    ///
    /// Tags that were discarded are absent from the result; every snapshot
    /// tag is removed either way.
    pub fn export_all(&self, policy: ExportPolicy) -> BTreeMap<String, String> {
        self.tag_names()
            .into_iter()
            .filter_map(|tag| self.export(&tag, policy).map(|report| (tag, report)))
            .collect()
    }

    /// Export every tag under the configured default policy
    pub fn export_all_default(&self) -> BTreeMap<String, String> {
        self.export_all(self.default_policy())
    }
}

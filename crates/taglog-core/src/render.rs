//! Tag report rendering
//!
//! A report is Markdown with four parts:
//!
//! - a header with the tag name, generation time, entry and error counts
//! - a summary of counts per level, most severe first
//! - a timeline with one section per entry, in the order they were appended
//! - a footer marker
//!
//! Tooling parses these markers, so their wording is stable.

use chrono::{DateTime, Utc};
use std::path::Path;

use taglog_core_types::Level;

use crate::entry::LogEntry;
use crate::errors::{Result, TagLogError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Turns a tag's entries into a report
pub trait Reporter: Send + Sync {
    /// Render `entries` (chronological) for `tag`
    ///
    /// Implementations must be deterministic for identical arguments.
    fn render(&self, tag: &str, entries: &[LogEntry], generated_at: DateTime<Utc>) -> String;
}

/// The default Markdown reporter
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReporter;

impl Reporter for MarkdownReporter {
    fn render(&self, tag: &str, entries: &[LogEntry], generated_at: DateTime<Utc>) -> String {
        let mut output = String::new();

        let error_count = entries.iter().filter(|e| e.is_error()).count();

        // Header
        output.push_str(&format!("# Tag Report: {}\n\n", tag));
        output.push_str(&format!(
            "- **Generated:** {}\n",
            generated_at.format(TIMESTAMP_FORMAT)
        ));
        output.push_str(&format!("- **Total entries:** {}\n", entries.len()));
        output.push_str(&format!("- **Errors:** {}\n\n", error_count));

        // Summary
        output.push_str("## Summary\n\n");
        for level in Level::BY_SEVERITY_DESC {
            let count = entries.iter().filter(|e| e.level() == level).count();
            if count > 0 {
                output.push_str(&format!(
                    "- {} {}: {}\n",
                    level.marker(),
                    level.name(),
                    count
                ));
            }
        }
        output.push('\n');

        // Timeline
        output.push_str("## Timeline\n\n");
        for (i, entry) in entries.iter().enumerate() {
            render_entry(&mut output, i + 1, entry);
        }

        // Footer
        output.push_str(&format!("---\n\n_End of report: {}_\n", tag));

        output
    }
}

fn render_entry(output: &mut String, ordinal: usize, entry: &LogEntry) {
    let level = entry.level();
    output.push_str(&format!(
        "### {}. [{}] {} {} · `{}`\n\n",
        ordinal,
        entry.timestamp().format(TIMESTAMP_FORMAT),
        level.marker(),
        level.name(),
        entry.location().short()
    ));

    let message = entry.message();
    if message.starts_with(['{', '[']) {
        push_fenced(output, "json", message);
    } else {
        output.push_str(&format!("{}\n\n", message));
    }

    if let Some(error) = entry.error() {
        output.push_str(&format!("**Error:** {}\n\n", error));
    }

    if let Some(stack) = entry.stack_text() {
        output.push_str("<details>\n<summary>Stack trace</summary>\n\n");
        push_fenced(output, "text", stack.trim_end());
        output.push_str("</details>\n\n");
    }
}

/// Code block whose fence outruns any backtick run inside `body`
fn push_fenced(output: &mut String, info: &str, body: &str) {
    let longest_run = body
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    output.push_str(&format!("{}{}\n{}\n{}\n\n", fence, info, body, fence));
}

/// Write a rendered report to `path`, replacing any existing file
///
/// # Errors
///
/// Returns `Io` when the file cannot be written.
pub fn write_report(path: impl AsRef<Path>, report: &str) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, report).map_err(|e| TagLogError::io(path, e))
}

/// Serialize entries as a pretty JSON array for tooling
///
/// # Errors
///
/// Returns `Serialization` if an entry cannot be encoded.
pub fn entries_to_json(entries: &[LogEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

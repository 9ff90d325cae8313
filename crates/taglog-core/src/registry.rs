//! Tag registry
//!
//! The registry maps tag names to chronological entry buckets. A bucket is
//! created by the first append to a tag and removed wholesale by export,
//! clear or reset; entries are never mutated in place.
//!
//! All access goes through one registry-wide mutex. Export decides under the
//! lock, moves the bucket out, and renders after the lock is released (see
//! [`crate::export`]).

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use taglog_core_types::{Level, Location};

use crate::buckets::Buckets;
use crate::callsite::{CallSiteResolver, Frame, FrameSource};
use crate::config::{ExportPolicy, TagLogConfig};
use crate::display::{ImmediateDisplay, TracingDisplay};
use crate::entry::LogEntry;
use crate::render::{MarkdownReporter, Reporter};
use crate::stack::{BacktraceCapture, StackCapture};
use crate::value::ValueFormatter;
use crate::CAPTURE_ENABLED;

const UNSERIALIZABLE_MESSAGE: &str = "<unserializable>";

/// Per-append options: severity, attached error and stack text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture {
    level: Level,
    error: Option<String>,
    stack_text: Option<String>,
}

impl Capture {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Attach an error; only its display form is kept
    pub fn error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Supply stack text instead of letting the registry capture one
    pub fn stack_text(mut self, stack_text: impl Into<String>) -> Self {
        self.stack_text = Some(stack_text.into());
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl From<Level> for Capture {
    fn from(level: Level) -> Self {
        Capture::new(level)
    }
}

/// Process-wide tag registry
///
/// Construct one per context (or use [`global`]). All operations take
/// `&self` and are safe to call from any thread.
pub struct TagRegistry {
    buckets: Mutex<Buckets>,
    resolver: CallSiteResolver,
    formatter: ValueFormatter,
    display: Arc<dyn ImmediateDisplay>,
    stack: Arc<dyn StackCapture>,
    reporter: Arc<dyn Reporter>,
    display_entries: bool,
    default_policy: ExportPolicy,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.tag_names())
            .field("resolver", &self.resolver)
            .field("formatter", &self.formatter)
            .field("display_entries", &self.display_entries)
            .field("default_policy", &self.default_policy)
            .finish_non_exhaustive()
    }
}

impl TagRegistry {
    /// Registry with default configuration and collaborators
    pub fn new() -> Self {
        TagRegistryBuilder::default().build()
    }

    /// Registry configured from `config` with default collaborators
    pub fn with_config(config: TagLogConfig) -> Self {
        TagRegistryBuilder::default().config(config).build()
    }

    pub fn builder() -> TagRegistryBuilder {
        TagRegistryBuilder::default()
    }

    /// Append a debug-level entry to `tag`
    #[track_caller]
    pub fn tag(&self, tag: &str, message: impl Into<Value>) {
        self.record(tag, message.into(), Capture::default(), Frame::caller());
    }

    /// Append an entry to `tag`
    ///
    /// For error levels without supplied stack text the current stack is
    /// captured once; the same text feeds both the entry and its location.
    /// Without stack text the location is the caller's own call-site.
    #[track_caller]
    pub fn append(&self, tag: &str, message: impl Into<Value>, capture: impl Into<Capture>) {
        self.record(tag, message.into(), capture.into(), Frame::caller());
    }

    /// Append any serializable message
    ///
    /// A message that fails to serialize is recorded as `<unserializable>`.
    #[track_caller]
    pub fn append_serialized<T>(&self, tag: &str, message: &T, capture: impl Into<Capture>)
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(message)
            .unwrap_or_else(|_| Value::String(UNSERIALIZABLE_MESSAGE.to_string()));
        self.record(tag, value, capture.into(), Frame::caller());
    }

    fn record(&self, tag: &str, message: Value, capture: Capture, caller: Frame) {
        if !CAPTURE_ENABLED {
            return;
        }

        let Capture {
            level,
            error,
            stack_text,
        } = capture;

        let stack_text = match stack_text {
            Some(text) => Some(text),
            None if level.is_error() => Some(self.stack.capture()),
            None => None,
        };
        let location = self.locate(stack_text.as_deref(), &caller);

        let entry = LogEntry::new(self.formatter.format(&message), level, location, Utc::now())
            .with_error(error)
            .with_stack_text(stack_text);

        if self.display_entries {
            self.display.show(tag, &entry);
        }
        self.lock().push(tag, entry);
    }

    fn locate(&self, stack_text: Option<&str>, caller: &Frame) -> Location {
        stack_text
            .map(|text| self.resolver.resolve(FrameSource::Raw(text)))
            .filter(|location| !location.is_unknown())
            .unwrap_or_else(|| {
                self.resolver
                    .resolve(FrameSource::Frames(std::slice::from_ref(caller)))
            })
    }

    /// Whether `tag` holds at least one entry
    pub fn has_tag(&self, tag: &str) -> bool {
        self.lock().get(tag).is_some()
    }

    /// Whether `tag` holds an error-level entry
    pub fn has_errors(&self, tag: &str) -> bool {
        self.lock()
            .get(tag)
            .is_some_and(|entries| entries.iter().any(LogEntry::is_error))
    }

    /// Number of entries under `tag`, 0 when absent
    pub fn entry_count(&self, tag: &str) -> usize {
        self.lock().get(tag).map_or(0, <[LogEntry]>::len)
    }

    /// Names of all non-empty tags, sorted
    pub fn tag_names(&self) -> Vec<String> {
        let mut names = self.lock().names();
        names.sort();
        names
    }

    /// Snapshot of the entries under `tag`
    pub fn entries(&self, tag: &str) -> Vec<LogEntry> {
        self.lock()
            .get(tag)
            .map(<[LogEntry]>::to_vec)
            .unwrap_or_default()
    }

    /// Drop the entries of `tag` without rendering
    pub fn clear(&self, tag: &str) {
        self.lock().remove(tag);
    }

    /// Drop every tag without rendering
    pub fn clear_all(&self) {
        self.lock().clear();
    }

    /// Return the registry to its freshly constructed state
    pub fn reset(&self) {
        self.clear_all();
    }

    pub fn default_policy(&self) -> ExportPolicy {
        self.default_policy
    }

    pub(crate) fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    // Entries are never mutated in place, so a panic while the lock was held
    // cannot leave a bucket half-written.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Buckets> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds a [`TagRegistry`] with injected configuration and collaborators
pub struct TagRegistryBuilder {
    config: TagLogConfig,
    display: Arc<dyn ImmediateDisplay>,
    stack: Arc<dyn StackCapture>,
    reporter: Arc<dyn Reporter>,
}

impl Default for TagRegistryBuilder {
    fn default() -> Self {
        Self {
            config: TagLogConfig::default(),
            display: Arc::new(TracingDisplay),
            stack: Arc::new(BacktraceCapture),
            reporter: Arc::new(MarkdownReporter),
        }
    }
}

impl TagRegistryBuilder {
    pub fn config(mut self, config: TagLogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn display(mut self, display: impl ImmediateDisplay + 'static) -> Self {
        self.display = Arc::new(display);
        self
    }

    pub fn stack_capture(mut self, stack: impl StackCapture + 'static) -> Self {
        self.stack = Arc::new(stack);
        self
    }

    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    pub fn build(self) -> TagRegistry {
        let TagLogConfig {
            display_entries,
            max_format_depth,
            internal_frames,
            export,
        } = self.config;

        TagRegistry {
            buckets: Mutex::new(Buckets::default()),
            resolver: CallSiteResolver::new().with_internal_frames(internal_frames),
            formatter: ValueFormatter::new().with_max_depth(max_format_depth),
            display: self.display,
            stack: self.stack,
            reporter: self.reporter,
            display_entries,
            default_policy: export,
        }
    }
}

static GLOBAL_REGISTRY: OnceLock<TagRegistry> = OnceLock::new();

/// The process-wide registry used by the `tag!` macros
pub fn global() -> &'static TagRegistry {
    GLOBAL_REGISTRY.get_or_init(TagRegistry::new)
}


#[cfg(all(
    test,
    not(all(feature = "capture", any(debug_assertions, feature = "release-capture")))
))]
mod compiled_out_tests {
    use super::*;
    use crate::display::NoDisplay;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStack(Arc<AtomicUsize>);

    impl StackCapture for CountingStack {
        fn capture(&self) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            String::new()
        }
    }

    #[test]
    fn test_appends_record_nothing() {
        let captures = Arc::new(AtomicUsize::new(0));
        let registry = TagRegistry::builder()
            .display(NoDisplay)
            .stack_capture(CountingStack(captures.clone()))
            .build();

        registry.tag("t", "x");
        registry.append("t", "bad", Capture::new(Level::Error).error("boom"));

        assert!(!CAPTURE_ENABLED);
        assert_eq!(captures.load(Ordering::SeqCst), 0);
        assert!(!registry.has_tag("t"));
        assert!(!registry.has_errors("t"));
        assert_eq!(registry.entry_count("t"), 0);
        assert!(registry.entries("t").is_empty());
        assert!(registry.tag_names().is_empty());
        assert!(registry.export("t", ExportPolicy::always()).is_none());
        assert!(registry.export_all(ExportPolicy::always()).is_empty());
    }
}

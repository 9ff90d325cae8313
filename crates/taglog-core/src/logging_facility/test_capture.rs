//! In-memory event capture for logging assertions
//!
//! [`init_test_capture`] installs a subscriber whose only layer records each
//! event's level, target and fields. Tests then look events up by tag or by
//! operation name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use taglog_core_types::schema::{FIELD_EVENT, FIELD_OP, FIELD_TAG};

const FIELD_MESSAGE: &str = "message";

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    level: Level,
    target: String,
    fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Rendered value of a field, if the event carried it
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn tag(&self) -> Option<&str> {
        self.field(FIELD_TAG)
    }

    pub fn message(&self) -> Option<&str> {
        self.field(FIELD_MESSAGE)
    }

    fn is_op(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

// Integers and booleans fall back to `record_debug`, whose output matches
// their display form.
#[derive(Default)]
struct Fields(BTreeMap<String, String>);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

type Shared = Arc<Mutex<Vec<CapturedEvent>>>;

fn lock(events: &Shared) -> MutexGuard<'_, Vec<CapturedEvent>> {
    events.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Layer that appends every event to a shared buffer
pub struct CaptureLayer {
    events: Shared,
}

impl CaptureLayer {
    /// A layer and the handle reading what it records
    pub fn new() -> (Self, TestCapture) {
        let events = Shared::default();
        (
            Self {
                events: events.clone(),
            },
            TestCapture { events },
        )
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);

        let metadata = event.metadata();
        lock(&self.events).push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            fields: fields.0,
        });
    }
}

/// Read side of a [`CaptureLayer`]
#[derive(Clone)]
pub struct TestCapture {
    events: Shared,
}

impl TestCapture {
    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        lock(&self.events).clone()
    }

    /// Events whose `tag` field equals `tag`, in emission order
    pub fn for_tag(&self, tag: &str) -> Vec<CapturedEvent> {
        self.matching(|e| e.tag() == Some(tag))
    }

    /// Events emitted by the `log_op_*` macros for `op` with the given phase
    pub fn for_op(&self, op: &str, event: &str) -> Vec<CapturedEvent> {
        self.matching(|e| e.is_op(op, event))
    }

    pub fn matching(&self, predicate: impl Fn(&CapturedEvent) -> bool) -> Vec<CapturedEvent> {
        lock(&self.events)
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    /// # Panics
    ///
    /// Panics when no event for `op` with phase `event` was recorded.
    pub fn assert_op(&self, op: &str, event: &str) {
        let events = lock(&self.events);
        assert!(
            events.iter().any(|e| e.is_op(op, event)),
            "no {}/{} event among {} captured",
            op,
            event,
            events.len()
        );
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }
}

/// Install the capture subscriber once per process and return its handle
///
/// When another global subscriber got there first the handle never receives
/// anything.
///
/// # Example
///
/// ```
/// use taglog_core::logging_facility::test_capture::init_test_capture;
/// use taglog_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("export", tag = "doc");
/// capture.assert_op("export", "start");
/// assert_eq!(capture.for_tag("doc").len(), 1);
/// ```
pub fn init_test_capture() -> TestCapture {
    static CAPTURE: OnceLock<TestCapture> = OnceLock::new();
    CAPTURE
        .get_or_init(|| {
            let (layer, capture) = CaptureLayer::new();
            let _ = tracing_subscriber::registry().with(layer).try_init();
            capture
        })
        .clone()
}

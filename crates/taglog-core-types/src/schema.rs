//! Field and event names shared by everything taglog emits through `tracing`
//!
//! The operation macros, the immediate display and the test capture layer
//! all read these, so renaming one here renames it everywhere.

// Operation events
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Immediate display
pub const FIELD_TAG: &str = "tag";
pub const FIELD_SEVERITY: &str = "severity";
pub const FIELD_LOCATION: &str = "location";

// Export outcome
pub const FIELD_OUTCOME: &str = "outcome";
pub const FIELD_REASON: &str = "reason";
pub const OUTCOME_RENDERED: &str = "rendered";
pub const OUTCOME_DISCARDED: &str = "discarded";
pub const OUTCOME_ABSENT: &str = "absent";

// Failed operations
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_unique() {
        let mut fields = vec![
            FIELD_COMPONENT,
            FIELD_OP,
            FIELD_EVENT,
            FIELD_DURATION_MS,
            FIELD_TAG,
            FIELD_SEVERITY,
            FIELD_LOCATION,
            FIELD_OUTCOME,
            FIELD_REASON,
            FIELD_ERR_KIND,
            FIELD_ERR_CODE,
        ];
        let total = fields.len();
        fields.sort_unstable();
        fields.dedup();
        assert_eq!(fields.len(), total);
    }

    #[test]
    fn test_outcomes_are_distinct() {
        assert_ne!(OUTCOME_RENDERED, OUTCOME_DISCARDED);
        assert_ne!(OUTCOME_RENDERED, OUTCOME_ABSENT);
        assert_ne!(OUTCOME_DISCARDED, OUTCOME_ABSENT);
    }
}

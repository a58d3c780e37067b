//! Canonical schema constants for the facade's own diagnostics
//!
//! These constants keep the structured fields emitted through `tracing`
//! consistent across modules and assertable in tests.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Facade state
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_QUIET: &str = "quiet";
pub const FIELD_INJECTED: &str = "injected";
pub const FIELD_NODE_ID: &str = "node_id";

// Collection sizes
pub const FIELD_OUTPUT_COUNT: &str = "output_count";
pub const FIELD_FAILED_COUNT: &str = "failed_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_ENSURE_INITIALIZED: &str = "ensure_initialized";
pub const OP_PROPAGATE_IDENTITY: &str = "propagate_identity";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_error_field_keys_are_dotted() {
        assert_eq!(FIELD_ERR_KIND, "err.kind");
        assert_eq!(FIELD_ERR_CODE, "err.code");
    }

    #[test]
    fn test_op_names_are_distinct() {
        assert_ne!(OP_ENSURE_INITIALIZED, OP_PROPAGATE_IDENTITY);
    }
}

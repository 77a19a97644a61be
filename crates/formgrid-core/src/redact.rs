//! Value redaction for log output.
//!
//! Form values routinely carry personal data (names, wages, card numbers).
//! Keys, positions and counts are always logged; values only when the host
//! opted in.

use std::sync::atomic::{AtomicBool, Ordering};

static LOG_VALUES: AtomicBool = AtomicBool::new(false);

/// Placeholder used when value logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

pub fn set_value_logging(enabled: bool) {
    LOG_VALUES.store(enabled, Ordering::Release);
}

pub fn value_logging_enabled() -> bool {
    LOG_VALUES.load(Ordering::Acquire)
}

/// Returns the input value when value logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if value_logging_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

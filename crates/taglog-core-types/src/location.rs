//! Resolved call-site locations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Short form used when no call-site could be resolved
pub const UNKNOWN_LOCATION: &str = "unknown location";

/// A resolved call-site
///
/// `short` is the compact display form (last one or two path segments plus
/// `line:column`). `full` is the complete path when it could be resolved and
/// empty otherwise; when non-empty it always ends with `short`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    short: String,
    full: String,
}

impl Location {
    /// Create a location from its display and full forms
    pub fn new(short: impl Into<String>, full: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            full: full.into(),
        }
    }

    /// The sentinel returned when nothing could be resolved
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_LOCATION, "")
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn full(&self) -> &str {
        &self.full
    }

    pub fn is_unknown(&self) -> bool {
        self.short == UNKNOWN_LOCATION && self.full.is_empty()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short)
    }
}

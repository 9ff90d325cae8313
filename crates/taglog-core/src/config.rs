//! Registry configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! display_entries = true
//! max_format_depth = 32
//! internal_frames = ["my_logging_wrapper"]
//!
//! [export]
//! export = true
//! only_on_error = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{Result, TagLogError};
use crate::value::DEFAULT_MAX_DEPTH;

/// Policy applied when a tag is exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportPolicy {
    /// When false the tag is discarded without rendering
    pub export: bool,
    /// When true the tag is rendered only if it holds an error-level entry
    pub only_on_error: bool,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self {
            export: true,
            only_on_error: false,
        }
    }
}

impl ExportPolicy {
    /// Render unconditionally
    pub fn always() -> Self {
        Self::default()
    }

    /// Discard without rendering
    pub fn discard() -> Self {
        Self {
            export: false,
            only_on_error: false,
        }
    }

    /// Render only tags that recorded an error-level entry
    pub fn only_on_error() -> Self {
        Self {
            export: true,
            only_on_error: true,
        }
    }
}

/// Configuration for a [`TagRegistry`](crate::TagRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagLogConfig {
    /// Forward each appended entry to the immediate display
    pub display_entries: bool,
    /// Nesting depth rendered before values degrade to a placeholder
    pub max_format_depth: usize,
    /// Extra internal-frame substrings for call-site resolution
    pub internal_frames: Vec<String>,
    /// Policy used by `export_default` and `export_all_default`
    pub export: ExportPolicy,
}

impl Default for TagLogConfig {
    fn default() -> Self {
        Self {
            display_entries: true,
            max_format_depth: DEFAULT_MAX_DEPTH,
            internal_frames: Vec::new(),
            export: ExportPolicy::default(),
        }
    }
}

impl TagLogConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed TOML or unknown keys, and
    /// `InvalidConfig` when a value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// Returns `Io` when the file cannot be read, otherwise as
    /// [`TagLogConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TagLogError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when `max_format_depth` is zero or an internal
    /// frame entry is empty.
    pub fn validate(&self) -> Result<()> {
        if self.max_format_depth == 0 {
            return Err(TagLogError::InvalidConfig {
                reason: "max_format_depth must be at least 1".to_string(),
            });
        }
        if self.internal_frames.iter().any(|f| f.trim().is_empty()) {
            return Err(TagLogError::InvalidConfig {
                reason: "internal_frames entries must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

use thiserror::Error;

/// Result type alias using TagLogError
pub type Result<T> = std::result::Result<T, TagLogError>;

/// Canonical error kind taxonomy
///
/// Registry operations never fail; this taxonomy covers the ambient surfaces
/// around them (configuration loading, report persistence). Each kind maps to
/// a stable error code for programmatic handling and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConfig,
    ConfigParse,
    Io,
    Serialization,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ErrorKind::ConfigParse => "ERR_CONFIG_PARSE",
            ErrorKind::Io => "ERR_IO",
            ErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Errors raised by the fallible edges of taglog
#[derive(Error, Debug)]
pub enum TagLogError {
    /// Configuration parsed but holds an unusable value
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Configuration text is not valid TOML for the expected shape
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Reading a config file or writing a report failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A message could not be converted to a structured value
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TagLogError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            TagLogError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            TagLogError::ConfigParse(_) => ErrorKind::ConfigParse,
            TagLogError::Io { .. } => ErrorKind::Io,
            TagLogError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        TagLogError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorKind::InvalidConfig.code(), "ERR_INVALID_CONFIG");
        assert_eq!(ErrorKind::ConfigParse.code(), "ERR_CONFIG_PARSE");
        assert_eq!(ErrorKind::Io.code(), "ERR_IO");
        assert_eq!(ErrorKind::Serialization.code(), "ERR_SERIALIZATION");
    }

    #[test]
    fn test_invalid_config_display() {
        let err = TagLogError::InvalidConfig {
            reason: "max_format_depth must be at least 1".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert_eq!(
            err.to_string(),
            "Invalid configuration: max_format_depth must be at least 1"
        );
    }

    #[test]
    fn test_io_error_carries_path() {
        let err = TagLogError::io(
            "/tmp/report.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.code(), "ERR_IO");
        assert!(err.to_string().contains("/tmp/report.md"));
    }
}

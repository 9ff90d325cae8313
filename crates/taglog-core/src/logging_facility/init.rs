//! Subscriber setup
//!
//! Everything taglog emits lives under the `taglog` target: displayed
//! entries at `taglog`, operation traces at `taglog::ops`.

use std::sync::Once;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output style of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Pretty text, debug and above
    Development,
    /// One JSON object per line, info and above
    Production,
    /// Bare registry; test capture installs its own layer
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "taglog=debug",
            Profile::Production => "taglog=info",
            Profile::Test => "off",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_filter()))
    }
}

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has an effect, and it backs off if some
/// other global subscriber is already installed.
///
/// ```
/// use taglog_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(profile.filter())
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(profile.filter())
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
        if installed.is_ok() {
            tracing::debug!(target: "taglog::ops", ?profile, "logging initialised");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init(Profile::Test);
        init(Profile::Development);
        init(Profile::Production);
    }

    #[test]
    fn test_default_filters_scope_to_taglog() {
        assert_eq!(Profile::Development.default_filter(), "taglog=debug");
        assert_eq!(Profile::Production.default_filter(), "taglog=info");
        assert_eq!(Profile::Test.default_filter(), "off");
    }
}

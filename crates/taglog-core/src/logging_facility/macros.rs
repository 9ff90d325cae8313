//! Logging macros
//!
//! `log_op_*` trace the registry's own operations under the `taglog::ops`
//! target, with `component`, `op` and `event` fields named by
//! [`schema`](crate::types::schema). Extra `key = value` fields pass through
//! to `tracing` unchanged.
//!
//! `tag!` and `tag_error!` append to the [`global`](crate::global) registry
//! from the macro's call-site.

/// Operation started
///
/// ```
/// # use taglog_core::log_op_start;
/// log_op_start!("export");
/// log_op_start!("export", tag = "auth");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            target: "taglog::ops",
            component = module_path!(),
            op = $op,
            event = $crate::types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Operation finished; `duration_ms` is required
///
/// ```
/// # use taglog_core::log_op_end;
/// log_op_end!("export", duration_ms = 3);
/// log_op_end!("export", duration_ms = 3, outcome = "rendered");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            target: "taglog::ops",
            component = module_path!(),
            op = $op,
            event = $crate::types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Operation failed with a [`TagLogError`](crate::TagLogError)
///
/// ```
/// # use taglog_core::{log_op_error, TagLogConfig};
/// if let Err(err) = TagLogConfig::from_toml_str("max_format_depth = 0") {
///     log_op_error!("load_config", err, duration_ms = 1);
/// }
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let err: &$crate::TagLogError = &$err;
        tracing::error!(
            target: "taglog::ops",
            component = module_path!(),
            op = $op,
            event = $crate::types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?err.kind(),
            err_code = err.code()
            $(, $($field)*)?
        )
    }};
}

/// Append to a tag in the global registry
///
/// Defaults to `Level::Debug` when no level is given.
///
/// ```
/// use taglog_core::{tag, Level};
///
/// tag!("checkout", "cart loaded");
/// tag!("checkout", serde_json::json!({"items": 3}), Level::Info);
/// # if taglog_core::CAPTURE_ENABLED {
/// assert_eq!(taglog_core::global().entry_count("checkout"), 2);
/// # }
/// # taglog_core::global().clear("checkout");
/// ```
#[macro_export]
macro_rules! tag {
    ($tag:expr, $msg:expr) => {
        $crate::global().append($tag, $msg, $crate::Capture::default())
    };
    ($tag:expr, $msg:expr, $level:expr) => {
        $crate::global().append($tag, $msg, $crate::Capture::new($level))
    };
}

/// Append an entry carrying an error to the global registry
///
/// The level defaults to `Level::Error`; the error is kept in display form.
///
/// ```
/// use taglog_core::tag_error;
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// tag_error!("upload", "write failed", err);
/// # if taglog_core::CAPTURE_ENABLED {
/// assert!(taglog_core::global().has_errors("upload"));
/// # }
/// # taglog_core::global().clear("upload");
/// ```
#[macro_export]
macro_rules! tag_error {
    ($tag:expr, $msg:expr, $err:expr) => {
        $crate::tag_error!($tag, $msg, $err, $crate::Level::Error)
    };
    ($tag:expr, $msg:expr, $err:expr, $level:expr) => {
        $crate::global().append($tag, $msg, $crate::Capture::new($level).error(&$err))
    };
}

//! `tracing` integration
//!
//! - [`init`] installs a process-wide subscriber for a [`Profile`]
//! - `log_op_start!`, `log_op_end!` and `log_op_error!` trace registry
//!   operations; `tag!` and `tag_error!` append to the global registry
//! - [`test_capture`] records events in memory for assertions
//!
//! ```rust
//! use taglog_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```
//!
//! Appended entries reach the subscriber through the default
//! [`TracingDisplay`](crate::display::TracingDisplay) under the `taglog`
//! target.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};

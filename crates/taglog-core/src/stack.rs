//! Host call-stack providers

use std::backtrace::Backtrace;

/// Supplies the raw text of the current call stack
///
/// Called at most once per appended error-level entry.
pub trait StackCapture: Send + Sync {
    fn capture(&self) -> String;
}

/// Captures the stack with `std::backtrace`, regardless of `RUST_BACKTRACE`
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceCapture;

impl StackCapture for BacktraceCapture {
    fn capture(&self) -> String {
        Backtrace::force_capture().to_string()
    }
}

/// Returns a fixed stack text
///
/// Useful for deterministic reports in tests and for hosts that gather
/// stacks themselves.
#[derive(Debug, Clone, Default)]
pub struct FixedStack(pub String);

impl StackCapture for FixedStack {
    fn capture(&self) -> String {
        self.0.clone()
    }
}

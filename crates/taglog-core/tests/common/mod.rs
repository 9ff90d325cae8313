use taglog_core::display::NoDisplay;
use taglog_core::stack::FixedStack;
use taglog_core::TagRegistry;

/// Stack text shaped like a `std::backtrace` dump from an application
#[allow(dead_code)]
pub const APP_STACK: &str = "\
   0: std::backtrace::Backtrace::force_capture
             at /rustc/0000/library/std/src/backtrace.rs:312:9
   1: taglog_core::registry::TagRegistry::record
             at /work/taglog/crates/taglog-core/src/registry.rs:140:41
   2: billing::invoice::finalize
             at /work/billing/src/invoice.rs:57:13
   3: billing::main
             at /work/billing/src/main.rs:9:5";

/// Create a registry that prints nothing and captures a fixed stack
#[allow(dead_code)]
pub fn quiet_registry() -> TagRegistry {
    TagRegistry::builder()
        .display(NoDisplay)
        .stack_capture(FixedStack(APP_STACK.to_string()))
        .build()
}

/// Pull the `Total entries` count out of a rendered report
#[allow(dead_code)]
pub fn total_entries(report: &str) -> usize {
    report
        .lines()
        .find_map(|line| line.strip_prefix("- **Total entries:** "))
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or(0)
}

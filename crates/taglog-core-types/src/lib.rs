//! Core types shared across taglog facilities
//!
//! This crate provides the foundational value types used by the tag registry,
//! the reporter and the logging facility:
//!
//! - **Severity**: `Level` and its error predicate
//! - **Call-site**: `Location` with its sentinel form
//! - **Schema constants**: Canonical field keys and event names

pub mod level;
pub mod location;
pub mod schema;

pub use level::{Level, ParseLevelError};
pub use location::Location;

//! Utility functions for display formatting.

pub mod format;

pub use format::{format_datetime, format_fare, or_na, truncate_string, NOT_AVAILABLE};

//! Utility functions for string comparison, formatting and date parsing.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{cmp_ignore_case, contains_ignore_case, format_date, parse_timestamp, truncate};

//! Generic utilities with no catalog knowledge.

pub mod debounce;
pub mod format;

// Re-export commonly used functions at module level
pub use debounce::{debounce, Debouncer};
pub use format::{cmp_ignore_case, contains_ignore_case};

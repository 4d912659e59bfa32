//! Filtered and searched views over the catalog.
//!
//! This module provides the `SearchEngine`, which prefers a store-side query
//! and falls back to an in-memory scan with identical matching semantics when
//! storage misbehaves.

pub mod engine;

pub use engine::SearchEngine;

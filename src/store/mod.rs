//! Local persistent store for offline catalog access.
//!
//! This module provides the `MenuStore`, a SQLite-backed table of catalog
//! items that acts as a best-effort cache in front of the remote source.
//! It is never a system of record the caller can be blocked by: every
//! `StorageError` has a documented fallback (remote fetch or in-memory
//! filtering) at the layer above.

pub mod error;
pub mod menu;

pub use error::StorageError;
pub use menu::{MenuStore, StoreStatus};

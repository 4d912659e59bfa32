//! Cache-or-fetch synchronization between the store and the remote source.
//!
//! This module provides the `SyncCoordinator`, the single entry point the
//! surrounding application uses to obtain the catalog.

pub mod coordinator;

pub use coordinator::SyncCoordinator;

//! `stockpile-store`: storage collaborator boundary.
//!
//! The persistence engine is an external collaborator: this crate defines the
//! async traits the core consumes, the storage error type the service layer
//! translates, an in-memory reference implementation for tests/dev, and the
//! per-item lock registry that serializes ledger writes.

pub mod error;
pub mod in_memory;
pub mod item_locks;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use in_memory::InMemoryStore;
pub use item_locks::ItemLockMap;
pub use traits::{InventoryStore, TeamDirectory};

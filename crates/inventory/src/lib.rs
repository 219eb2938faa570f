//! `stockpile-inventory`: items, locations, and the stock ledger
//! arithmetic.
//!
//! Business rules only, implemented as deterministic domain logic (no IO, no
//! HTTP, no storage). The ledger is the sole legitimate mutator of an item's
//! `current_stock`; the arithmetic here is what every writer must go through.

pub mod item;
pub mod ledger;
pub mod location;
pub mod transaction;

pub use item::Item;
pub use ledger::{apply_effect, reverse_effect, signed_effect, validate_draft};
pub use location::Location;
pub use transaction::{StockTransaction, TransactionDraft, TransactionKind};

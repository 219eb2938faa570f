//! `stockpile-service`: the service facade callers compose an HTTP layer on.
//!
//! For each operation: validate payload shape → authorization gate →
//! subscription gate (for gated endpoints) → ledger/directory operation →
//! structured result. Domain errors never cross this boundary untyped, and
//! storage-specific text never crosses it at all.

pub mod facade;
pub mod payload;
pub mod response;

pub use facade::InventoryService;
pub use payload::{
    CreateItemPayload, CreateLocationPayload, CreateTeamPayload, CreateTransactionPayload,
    MemberRolePayload, MemberUserPayload, UpdateTeamPayload,
};
pub use response::{ApiResponse, ErrorBody, ServiceError, ServiceResult};

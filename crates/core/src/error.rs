//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Entity kinds referenced by not-found errors.
///
/// Keeping this closed lets the facade emit stable, per-entity error codes
/// without string matching.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Team,
    User,
    Membership,
    Item,
    Location,
    Transaction,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Team => "team",
            EntityKind::User => "user",
            EntityKind::Membership => "membership",
            EntityKind::Item => "item",
            EntityKind::Location => "location",
            EntityKind::Transaction => "transaction",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts, authorization). Infrastructure concerns belong to
/// the storage layer and are translated at the service boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No identifiable actor on the request.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Identifiable actor lacking a relationship to the target resource.
    #[error("forbidden")]
    Forbidden,

    /// Actor is a member but their role does not grant the permission.
    ///
    /// Distinct from [`DomainError::Forbidden`] so callers can message
    /// "ask your team admin" instead of "you don't belong here".
    #[error("insufficient permissions")]
    InsufficientPermissions,

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// A conflict occurred (e.g. uniqueness violation, irreversible entry).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stock mutation would drive an item's stock below zero.
    #[error("insufficient stock: {0}")]
    InsufficientStock(String),

    /// The operation would leave a team without an active admin membership.
    #[error("cannot remove the last active admin of a team")]
    LastAdmin,

    /// The team's subscription does not entitle it to this feature.
    #[error("subscription inactive")]
    SubscriptionInactive,

    /// Unexpected storage/logic failure. The message is for logs only; the
    /// service boundary replaces it with a generic one.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(kind: EntityKind) -> Self {
        Self::NotFound(kind)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient_stock(msg: impl Into<String>) -> Self {
        Self::InsufficientStock(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

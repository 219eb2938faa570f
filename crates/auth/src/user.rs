//! User entity: actor identity with a system-wide role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockpile_core::{Entity, UserId};

use crate::roles::GlobalRole;

/// A user account.
///
/// # Invariants
/// - Users are never deleted, only referenced (ledger attribution must
///   survive offboarding).
/// - `global_role` is changed only by privileged admin action.
/// - `credential_hash` is opaque here; verification is an external
///   collaborator's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub global_role: GlobalRole,
    pub credential_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, global_role: GlobalRole, credential_hash: impl Into<String>) -> Self {
        Self {
            id,
            global_role,
            credential_hash: credential_hash.into(),
            created_at: Utc::now(),
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

//! Role matrix: static (role, permission) → allow/deny tables.
//!
//! - No side effects
//! - No IO
//! - Table values are fixed at compile time

use crate::permissions::{GlobalPermission, TeamPermission};
use crate::roles::{GlobalRole, TeamRole};

/// Evaluate a global permission against a global role.
pub fn allows_global(role: GlobalRole, permission: GlobalPermission) -> bool {
    match permission {
        GlobalPermission::TeamCreate => {
            matches!(role, GlobalRole::Admin | GlobalRole::SuperAdmin)
        }
    }
}

/// Evaluate a team-scoped permission against a team membership role.
pub fn allows_team(role: TeamRole, permission: TeamPermission) -> bool {
    match role {
        // Team admins hold every team-scoped permission.
        TeamRole::Admin => true,
        // Operators may write inventory data but not delete it, nor touch
        // team settings or the ledger history.
        TeamRole::Operator => matches!(
            permission,
            TeamPermission::ItemWrite
                | TeamPermission::LocationWrite
                | TeamPermission::StockWrite
        ),
        // Viewers hold no write permissions at all.
        TeamRole::Viewer => false,
    }
}

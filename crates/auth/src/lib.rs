//! `stockpile-auth`: authorization boundary for the inventory core.
//!
//! Two-tier role model: a user carries one **global role** (system-wide) and,
//! per team, at most one **team role** through an active membership. The role
//! matrix is fixed at compile time; permission semantics are part of the
//! binary, not runtime data.

pub mod gate;
pub mod matrix;
pub mod membership;
pub mod permissions;
pub mod roles;
pub mod team;
pub mod user;

pub use gate::{
    authorize_global, authorize_team_scoped, require_team_member, PrincipalStore, TeamContext,
};
pub use matrix::{allows_global, allows_team};
pub use membership::{
    guard_role_change, guard_suspension, MembershipStatus, TeamMembership,
};
pub use permissions::{GlobalPermission, TeamPermission};
pub use roles::{GlobalRole, TeamRole};
pub use team::Team;
pub use user::User;

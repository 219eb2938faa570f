//! Team membership: the (team, user) pair carrying a team role.
//!
//! Removal is modeled as a status transition to `Suspended`, never a row
//! deletion. Transaction history keeps pointing at a real membership and
//! audit attribution survives offboarding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockpile_core::{DomainError, DomainResult, TeamId, UserId};

use crate::roles::TeamRole;

/// Membership lifecycle state.
///
/// An enum rather than a boolean so future states (e.g. invited, expired)
/// slot in without churn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    #[default]
    Active,
    Suspended,
}

impl core::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MembershipStatus::Active => write!(f, "active"),
            MembershipStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// A user's membership in a team.
///
/// # Invariants
/// - The (team_id, user_id) pair is unique.
/// - Once a team has any membership, it must keep ≥ 1 active membership with
///   role `Admin`; the guards below reject operations that would break this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub team_id: TeamId,
    pub user_id: UserId,
    pub role: TeamRole,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamMembership {
    pub fn new(team_id: TeamId, user_id: UserId, role: TeamRole) -> Self {
        let now = Utc::now();
        Self {
            team_id,
            user_id,
            role,
            status: MembershipStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }

    pub fn is_active_admin(&self) -> bool {
        self.is_active() && self.role == TeamRole::Admin
    }
}

fn active_admin_count(memberships: &[TeamMembership]) -> usize {
    memberships.iter().filter(|m| m.is_active_admin()).count()
}

fn find_member<'a>(
    memberships: &'a [TeamMembership],
    user_id: UserId,
) -> DomainResult<&'a TeamMembership> {
    memberships
        .iter()
        .find(|m| m.user_id == user_id && m.is_active())
        .ok_or(DomainError::not_found(stockpile_core::EntityKind::Membership))
}

/// Validate a role change against the last-admin invariant.
///
/// `memberships` must be the team's full membership list. Returns the updated
/// membership row to persist.
pub fn guard_role_change(
    memberships: &[TeamMembership],
    user_id: UserId,
    new_role: TeamRole,
) -> DomainResult<TeamMembership> {
    let member = find_member(memberships, user_id)?;

    // Demoting the last active admin would orphan the team.
    if member.is_active_admin() && new_role != TeamRole::Admin && active_admin_count(memberships) <= 1
    {
        return Err(DomainError::LastAdmin);
    }

    let mut updated = member.clone();
    updated.role = new_role;
    updated.updated_at = Utc::now();
    Ok(updated)
}

/// Validate a member removal (suspension) against the last-admin invariant.
///
/// Returns the suspended membership row to persist.
pub fn guard_suspension(
    memberships: &[TeamMembership],
    user_id: UserId,
) -> DomainResult<TeamMembership> {
    let member = find_member(memberships, user_id)?;

    if member.is_active_admin() && active_admin_count(memberships) <= 1 {
        return Err(DomainError::LastAdmin);
    }

    let mut updated = member.clone();
    updated.status = MembershipStatus::Suspended;
    updated.updated_at = Utc::now();
    Ok(updated)
}

//! Authorization gate: "can user U perform permission P on team T".
//!
//! Read-only; the gate never mutates anything. Check ordering is a contract:
//! authentication → team existence → membership → permission. Callers must
//! not learn more about tenant existence than the 404/403 split already
//! implies.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use stockpile_core::{DomainError, DomainResult, EntityKind, TeamId, UserId};

use crate::matrix::{allows_global, allows_team};
use crate::membership::TeamMembership;
use crate::permissions::{GlobalPermission, TeamPermission};
use crate::team::Team;
use crate::user::User;

/// Storage collaborator the gate resolves principals through.
///
/// Implementations map their own storage failures to
/// [`DomainError::Internal`]; the gate treats every error as opaque.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn get_team(&self, team_id: TeamId) -> DomainResult<Option<Team>>;

    async fn get_user(&self, user_id: UserId) -> DomainResult<Option<User>>;

    /// Load the **active** membership row for (team, user). Suspended rows
    /// are invisible here.
    async fn get_active_membership(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> DomainResult<Option<TeamMembership>>;
}

#[async_trait]
impl<S> PrincipalStore for Arc<S>
where
    S: PrincipalStore + ?Sized,
{
    async fn get_team(&self, team_id: TeamId) -> DomainResult<Option<Team>> {
        (**self).get_team(team_id).await
    }

    async fn get_user(&self, user_id: UserId) -> DomainResult<Option<User>> {
        (**self).get_user(user_id).await
    }

    async fn get_active_membership(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> DomainResult<Option<TeamMembership>> {
        (**self).get_active_membership(team_id, user_id).await
    }
}

/// Everything loaded while authorizing a team-scoped operation.
///
/// Returned so the caller can reuse the team's billing snapshot for the
/// subscription gate instead of re-reading the team.
#[derive(Debug, Clone)]
pub struct TeamContext {
    pub team: Team,
    pub user: User,
    pub membership: TeamMembership,
}

/// Authorize a global (cross-team) permission.
///
/// Self-service only: the request user must be the target user.
pub async fn authorize_global<S>(
    store: &S,
    permission: GlobalPermission,
    request_user_id: Option<UserId>,
    target_user_id: UserId,
) -> DomainResult<User>
where
    S: PrincipalStore + ?Sized,
{
    let Some(request_user_id) = request_user_id else {
        return Err(DomainError::Unauthenticated);
    };

    if request_user_id != target_user_id {
        debug!(%request_user_id, %target_user_id, "global authorization rejected: not self");
        return Err(DomainError::Forbidden);
    }

    let Some(user) = store.get_user(request_user_id).await? else {
        // An unknown user id on the request means the session resolved to
        // nobody, not that a resource is missing.
        return Err(DomainError::Unauthenticated);
    };

    if !allows_global(user.global_role, permission) {
        debug!(%request_user_id, %permission, role = %user.global_role, "global permission denied");
        return Err(DomainError::InsufficientPermissions);
    }

    Ok(user)
}

/// Resolve an active team member without consulting the matrix.
///
/// Reads that any member may perform (lists, detail views) stop here;
/// [`authorize_team_scoped`] layers the permission check on top.
pub async fn require_team_member<S>(
    store: &S,
    team_id: TeamId,
    request_user_id: Option<UserId>,
) -> DomainResult<TeamContext>
where
    S: PrincipalStore + ?Sized,
{
    let Some(request_user_id) = request_user_id else {
        return Err(DomainError::Unauthenticated);
    };

    let Some(team) = store.get_team(team_id).await? else {
        return Err(DomainError::not_found(EntityKind::Team));
    };

    let Some(user) = store.get_user(request_user_id).await? else {
        return Err(DomainError::Unauthenticated);
    };

    let Some(membership) = store.get_active_membership(team_id, request_user_id).await? else {
        debug!(%request_user_id, %team_id, "team authorization rejected: no membership");
        return Err(DomainError::Forbidden);
    };

    Ok(TeamContext {
        team,
        user,
        membership,
    })
}

/// Authorize a team-scoped permission.
///
/// Absence of a membership row is [`DomainError::Forbidden`]; a membership
/// with a role the matrix denies is [`DomainError::InsufficientPermissions`].
/// The two are deliberately distinct (UI messaging).
pub async fn authorize_team_scoped<S>(
    store: &S,
    permission: TeamPermission,
    team_id: TeamId,
    request_user_id: Option<UserId>,
) -> DomainResult<TeamContext>
where
    S: PrincipalStore + ?Sized,
{
    let ctx = require_team_member(store, team_id, request_user_id).await?;

    if !allows_team(ctx.membership.role, permission) {
        debug!(
            request_user_id = %ctx.user.id,
            %team_id,
            %permission,
            role = %ctx.membership.role,
            "team permission denied"
        );
        return Err(DomainError::InsufficientPermissions);
    }

    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{GlobalRole, TeamRole};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubStore {
        teams: Mutex<HashMap<TeamId, Team>>,
        users: Mutex<HashMap<UserId, User>>,
        memberships: Mutex<HashMap<(TeamId, UserId), TeamMembership>>,
    }

    impl StubStore {
        fn with_team(self, team: Team) -> Self {
            self.teams.lock().unwrap().insert(team.id, team);
            self
        }

        fn with_user(self, user: User) -> Self {
            self.users.lock().unwrap().insert(user.id, user);
            self
        }

        fn with_membership(self, membership: TeamMembership) -> Self {
            self.memberships
                .lock()
                .unwrap()
                .insert((membership.team_id, membership.user_id), membership);
            self
        }
    }

    #[async_trait]
    impl PrincipalStore for StubStore {
        async fn get_team(&self, team_id: TeamId) -> DomainResult<Option<Team>> {
            Ok(self.teams.lock().unwrap().get(&team_id).cloned())
        }

        async fn get_user(&self, user_id: UserId) -> DomainResult<Option<User>> {
            Ok(self.users.lock().unwrap().get(&user_id).cloned())
        }

        async fn get_active_membership(
            &self,
            team_id: TeamId,
            user_id: UserId,
        ) -> DomainResult<Option<TeamMembership>> {
            Ok(self
                .memberships
                .lock()
                .unwrap()
                .get(&(team_id, user_id))
                .filter(|m| m.is_active())
                .cloned())
        }
    }

    fn fixture() -> (StubStore, TeamId, UserId) {
        let team = Team::new(TeamId::new(), "Warehouse A", None).unwrap();
        let user = User::new(UserId::new(), GlobalRole::Operator, "x");
        let (team_id, user_id) = (team.id, user.id);
        let store = StubStore::default().with_team(team).with_user(user);
        (store, team_id, user_id)
    }

    #[tokio::test]
    async fn anonymous_is_unauthenticated_before_anything_else() {
        let (store, team_id, _) = fixture();
        // Even a nonexistent team must not be revealed to anonymous callers.
        let err = authorize_team_scoped(&store, TeamPermission::ItemWrite, team_id, None)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Unauthenticated);

        let err = authorize_team_scoped(&store, TeamPermission::ItemWrite, TeamId::new(), None)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Unauthenticated);
    }

    #[tokio::test]
    async fn missing_team_is_not_found() {
        let (store, _, user_id) = fixture();
        let err = authorize_team_scoped(
            &store,
            TeamPermission::ItemWrite,
            TeamId::new(),
            Some(user_id),
        )
        .await
        .unwrap_err();
        assert_eq!(err, DomainError::NotFound(EntityKind::Team));
    }

    #[tokio::test]
    async fn no_membership_is_forbidden_not_insufficient() {
        let (store, team_id, user_id) = fixture();
        let err = authorize_team_scoped(&store, TeamPermission::ItemWrite, team_id, Some(user_id))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Forbidden);
    }

    #[tokio::test]
    async fn weak_role_is_insufficient_permissions() {
        let (store, team_id, user_id) = fixture();
        let store =
            store.with_membership(TeamMembership::new(team_id, user_id, TeamRole::Viewer));
        let err = authorize_team_scoped(&store, TeamPermission::ItemWrite, team_id, Some(user_id))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::InsufficientPermissions);
    }

    #[tokio::test]
    async fn suspended_membership_is_forbidden() {
        let (store, team_id, user_id) = fixture();
        let mut membership = TeamMembership::new(team_id, user_id, TeamRole::Admin);
        membership.status = crate::membership::MembershipStatus::Suspended;
        let store = store.with_membership(membership);
        let err = authorize_team_scoped(&store, TeamPermission::ItemWrite, team_id, Some(user_id))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Forbidden);
    }

    #[tokio::test]
    async fn sufficient_role_returns_context() {
        let (store, team_id, user_id) = fixture();
        let store =
            store.with_membership(TeamMembership::new(team_id, user_id, TeamRole::Operator));
        let ctx = authorize_team_scoped(&store, TeamPermission::StockWrite, team_id, Some(user_id))
            .await
            .unwrap();
        assert_eq!(ctx.team.id, team_id);
        assert_eq!(ctx.membership.role, TeamRole::Operator);
    }

    #[tokio::test]
    async fn global_requires_self_service() {
        let (store, _, user_id) = fixture();
        let err = authorize_global(
            &store,
            GlobalPermission::TeamCreate,
            Some(user_id),
            UserId::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, DomainError::Forbidden);
    }

    #[tokio::test]
    async fn global_matrix_denies_operator() {
        let (store, _, user_id) = fixture();
        let err = authorize_global(&store, GlobalPermission::TeamCreate, Some(user_id), user_id)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::InsufficientPermissions);
    }

    #[tokio::test]
    async fn global_allows_admin_self() {
        let admin = User::new(UserId::new(), GlobalRole::Admin, "x");
        let user_id = admin.id;
        let store = StubStore::default().with_user(admin);
        let user = authorize_global(&store, GlobalPermission::TeamCreate, Some(user_id), user_id)
            .await
            .unwrap();
        assert_eq!(user.id, user_id);
    }
}

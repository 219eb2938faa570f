//! Service facade: the only place the gates and the ledger are composed.
//!
//! Every operation follows the same pipeline: parse → authorization gate →
//! subscription gate (for gated endpoints) → domain operation. The facade
//! never talks to storage except through the collaborator traits, and it is
//! the single writer of `current_stock` (always under the item's lock).

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use stockpile_auth::{
    authorize_global, authorize_team_scoped, guard_role_change, guard_suspension,
    require_team_member, GlobalPermission, Team, TeamContext, TeamMembership, TeamPermission,
    TeamRole,
};
use stockpile_billing::is_subscription_active;
use stockpile_core::{
    DomainError, DomainResult, EntityKind, ItemId, LocationId, TeamId, TransactionId, UserId,
};
use stockpile_inventory::{
    apply_effect, reverse_effect, validate_draft, Item, Location, StockTransaction,
    TransactionDraft,
};
use stockpile_store::{InventoryStore, ItemLockMap, StoreError, TeamDirectory};

use crate::payload::{
    self, CreateItemPayload, CreateLocationPayload, CreateTeamPayload, CreateTransactionPayload,
    MemberRolePayload, MemberUserPayload, UpdateTeamPayload,
};
use crate::response::{ServiceError, ServiceResult};

/// Translate a storage failure into the domain vocabulary.
///
/// Uniqueness violations surface as conflicts; everything else is logged and
/// masked as an internal error.
fn store_err(err: StoreError) -> DomainError {
    match err {
        StoreError::Conflict(msg) => DomainError::conflict(msg),
        other => {
            error!(error = %other, "storage operation failed");
            DomainError::internal(other.to_string())
        }
    }
}

/// The team-scoped inventory core, composed.
pub struct InventoryService<S> {
    store: Arc<S>,
    item_locks: ItemLockMap,
}

impl<S> InventoryService<S>
where
    S: TeamDirectory + InventoryStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            item_locks: ItemLockMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Subscription gate for team-scoped gated endpoints.
    fn require_entitled(ctx: &TeamContext) -> DomainResult<()> {
        if !is_subscription_active(&ctx.team.billing, Utc::now()) {
            debug!(team_id = %ctx.team.id, "subscription gate rejected");
            return Err(DomainError::SubscriptionInactive);
        }
        Ok(())
    }

    /// Verify a referenced location exists and belongs to the team.
    /// `None` is the default/unassigned bucket and always resolves.
    async fn resolve_location(
        &self,
        team_id: TeamId,
        location_id: Option<LocationId>,
    ) -> DomainResult<()> {
        let Some(location_id) = location_id else {
            return Ok(());
        };
        let Some(location) = self
            .store
            .get_location(location_id)
            .await
            .map_err(store_err)?
        else {
            return Err(DomainError::not_found(EntityKind::Location));
        };
        if location.team_id != team_id {
            return Err(DomainError::Forbidden);
        }
        Ok(())
    }

    /// Load an item and verify team ownership. The item's `team_id` is
    /// authoritative; cross-team references are `Forbidden`.
    async fn resolve_item(&self, team_id: TeamId, item_id: ItemId) -> DomainResult<Item> {
        let Some(item) = self.store.get_item(item_id).await.map_err(store_err)? else {
            return Err(DomainError::not_found(EntityKind::Item));
        };
        if item.team_id != team_id {
            return Err(DomainError::Forbidden);
        }
        Ok(item)
    }

    // ── Teams ────────────────────────────────────────────────────────────

    /// Create a team; the creator becomes its first admin member.
    pub async fn create_team(
        &self,
        request_user_id: Option<UserId>,
        raw: serde_json::Value,
    ) -> ServiceResult<Team> {
        let payload: CreateTeamPayload = payload::parse(raw)?;
        let Some(user_id) = request_user_id else {
            return Err(DomainError::Unauthenticated.into());
        };
        let user = authorize_global(
            &*self.store,
            GlobalPermission::TeamCreate,
            request_user_id,
            user_id,
        )
        .await?;

        let team = Team::new(TeamId::new(), payload.name, payload.company_id)?;
        let first_admin = TeamMembership::new(team.id, user.id, TeamRole::Admin);
        self.store
            .insert_team(team.clone(), first_admin)
            .await
            .map_err(store_err)?;

        info!(team_id = %team.id, user_id = %user.id, "team created");
        Ok(team)
    }

    pub async fn update_team(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        raw: serde_json::Value,
    ) -> ServiceResult<Team> {
        let payload: UpdateTeamPayload = payload::parse(raw)?;
        let ctx =
            authorize_team_scoped(&*self.store, TeamPermission::TeamUpdate, team_id, request_user_id)
                .await?;

        let mut team = ctx.team;
        team.rename(payload.name)?;
        self.store
            .update_team(team.clone())
            .await
            .map_err(store_err)?;
        Ok(team)
    }

    /// Delete a team. Refused while the team still owns inventory data; the
    /// ledger is never cascaded away.
    pub async fn delete_team(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
    ) -> ServiceResult<()> {
        authorize_team_scoped(&*self.store, TeamPermission::TeamDelete, team_id, request_user_id)
            .await?;

        let items = self.store.list_items(team_id).await.map_err(store_err)?;
        if !items.is_empty() {
            return Err(DomainError::conflict("team still owns items").into());
        }
        let transactions = self
            .store
            .list_transactions(team_id)
            .await
            .map_err(store_err)?;
        if !transactions.is_empty() {
            return Err(DomainError::conflict("team still owns transactions").into());
        }
        let locations = self
            .store
            .list_locations(team_id)
            .await
            .map_err(store_err)?;
        if !locations.is_empty() {
            return Err(DomainError::conflict("team still owns locations").into());
        }

        self.store.delete_team(team_id).await.map_err(store_err)?;
        info!(%team_id, "team deleted");
        Ok(())
    }

    // ── Members ──────────────────────────────────────────────────────────

    /// Attach a user to the team with a role.
    pub async fn add_member(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        raw: serde_json::Value,
    ) -> ServiceResult<TeamMembership> {
        let payload: MemberRolePayload = payload::parse(raw)?;
        authorize_team_scoped(&*self.store, TeamPermission::TeamUpdate, team_id, request_user_id)
            .await?;

        if self
            .store
            .get_user(payload.user_id)
            .await
            .map_err(ServiceError::from)?
            .is_none()
        {
            return Err(DomainError::not_found(EntityKind::User).into());
        }

        let membership = TeamMembership::new(team_id, payload.user_id, payload.role);
        self.store
            .insert_membership(membership.clone())
            .await
            .map_err(store_err)?;
        Ok(membership)
    }

    /// Change a member's role. Rejected when it would demote the team's last
    /// active admin.
    pub async fn update_member_role(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        raw: serde_json::Value,
    ) -> ServiceResult<TeamMembership> {
        let payload: MemberRolePayload = payload::parse(raw)?;
        authorize_team_scoped(&*self.store, TeamPermission::TeamUpdate, team_id, request_user_id)
            .await?;

        let memberships = self
            .store
            .list_team_memberships(team_id)
            .await
            .map_err(store_err)?;
        let updated = guard_role_change(&memberships, payload.user_id, payload.role)?;
        self.store
            .update_membership(updated.clone())
            .await
            .map_err(store_err)?;
        Ok(updated)
    }

    /// Remove a member: a status transition to suspended, never a deletion.
    /// Rejected when it would remove the team's last active admin.
    pub async fn remove_member(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        raw: serde_json::Value,
    ) -> ServiceResult<TeamMembership> {
        let payload: MemberUserPayload = payload::parse(raw)?;
        authorize_team_scoped(&*self.store, TeamPermission::TeamUpdate, team_id, request_user_id)
            .await?;

        let memberships = self
            .store
            .list_team_memberships(team_id)
            .await
            .map_err(store_err)?;
        let updated = guard_suspension(&memberships, payload.user_id)?;
        self.store
            .update_membership(updated.clone())
            .await
            .map_err(store_err)?;
        Ok(updated)
    }

    // ── Items ────────────────────────────────────────────────────────────

    pub async fn create_item(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        raw: serde_json::Value,
    ) -> ServiceResult<Item> {
        let payload: CreateItemPayload = payload::parse(raw)?;
        let ctx =
            authorize_team_scoped(&*self.store, TeamPermission::ItemWrite, team_id, request_user_id)
                .await?;
        Self::require_entitled(&ctx)?;

        self.resolve_location(team_id, payload.location_id).await?;

        let item = Item::new(
            ItemId::new(),
            team_id,
            payload.name,
            payload.barcode,
            payload.initial_quantity,
            payload.minimum_stock,
            payload.location_id,
        )?;
        self.store
            .insert_item(item.clone())
            .await
            .map_err(store_err)?;
        Ok(item)
    }

    /// Delete an item. Referential integrity is a domain error here, not a
    /// storage error: any transaction history blocks deletion.
    pub async fn delete_item(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        item_id: ItemId,
    ) -> ServiceResult<()> {
        let ctx =
            authorize_team_scoped(&*self.store, TeamPermission::ItemDelete, team_id, request_user_id)
                .await?;
        Self::require_entitled(&ctx)?;

        // The item's lock keeps a concurrent ledger write from slipping in
        // between the history check and the delete.
        let _guard = self.item_locks.acquire(item_id).await;

        self.resolve_item(team_id, item_id).await?;
        if self
            .store
            .item_has_transactions(item_id)
            .await
            .map_err(store_err)?
        {
            return Err(
                DomainError::conflict("item has transaction history and cannot be deleted").into(),
            );
        }
        self.store.delete_item(item_id).await.map_err(store_err)?;
        Ok(())
    }

    pub async fn list_items(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
    ) -> ServiceResult<Vec<Item>> {
        let ctx = require_team_member(&*self.store, team_id, request_user_id).await?;
        Self::require_entitled(&ctx)?;
        Ok(self.store.list_items(team_id).await.map_err(store_err)?)
    }

    /// Items whose stock has fallen below their reorder threshold.
    pub async fn list_low_stock_items(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
    ) -> ServiceResult<Vec<Item>> {
        let ctx = require_team_member(&*self.store, team_id, request_user_id).await?;
        Self::require_entitled(&ctx)?;
        let items = self.store.list_items(team_id).await.map_err(store_err)?;
        Ok(items.into_iter().filter(Item::is_below_minimum).collect())
    }

    /// Scan lookup: resolve an item by its barcode within the team.
    pub async fn get_item_by_barcode(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        barcode: &str,
    ) -> ServiceResult<Item> {
        let ctx = require_team_member(&*self.store, team_id, request_user_id).await?;
        Self::require_entitled(&ctx)?;
        let Some(item) = self
            .store
            .find_item_by_barcode(team_id, barcode)
            .await
            .map_err(store_err)?
        else {
            return Err(DomainError::not_found(EntityKind::Item).into());
        };
        Ok(item)
    }

    // ── Locations ────────────────────────────────────────────────────────

    pub async fn create_location(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        raw: serde_json::Value,
    ) -> ServiceResult<Location> {
        let payload: CreateLocationPayload = payload::parse(raw)?;
        let ctx = authorize_team_scoped(
            &*self.store,
            TeamPermission::LocationWrite,
            team_id,
            request_user_id,
        )
        .await?;
        Self::require_entitled(&ctx)?;

        let location = Location::new(LocationId::new(), team_id, payload.name)?;
        self.store
            .insert_location(location.clone())
            .await
            .map_err(store_err)?;
        Ok(location)
    }

    pub async fn delete_location(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        location_id: LocationId,
    ) -> ServiceResult<()> {
        let ctx = authorize_team_scoped(
            &*self.store,
            TeamPermission::LocationDelete,
            team_id,
            request_user_id,
        )
        .await?;
        Self::require_entitled(&ctx)?;

        let Some(location) = self
            .store
            .get_location(location_id)
            .await
            .map_err(store_err)?
        else {
            return Err(DomainError::not_found(EntityKind::Location).into());
        };
        if location.team_id != team_id {
            return Err(DomainError::Forbidden.into());
        }
        if self
            .store
            .location_in_use(location_id)
            .await
            .map_err(store_err)?
        {
            return Err(DomainError::conflict("location is still referenced").into());
        }
        self.store
            .delete_location(location_id)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    pub async fn list_locations(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
    ) -> ServiceResult<Vec<Location>> {
        let ctx = require_team_member(&*self.store, team_id, request_user_id).await?;
        Self::require_entitled(&ctx)?;
        Ok(self
            .store
            .list_locations(team_id)
            .await
            .map_err(store_err)?)
    }

    /// Resolve a location by its name within the team (case-insensitive).
    pub async fn get_location_by_name(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        name: &str,
    ) -> ServiceResult<Location> {
        let ctx = require_team_member(&*self.store, team_id, request_user_id).await?;
        Self::require_entitled(&ctx)?;
        let Some(location) = self
            .store
            .find_location_by_name(team_id, name)
            .await
            .map_err(store_err)?
        else {
            return Err(DomainError::not_found(EntityKind::Location).into());
        };
        Ok(location)
    }

    // ── Ledger ───────────────────────────────────────────────────────────

    /// Append a stock transaction and update the item's `current_stock`.
    ///
    /// The read-modify-write runs under the item's lock: two concurrent
    /// calls against the same item can never both base their write on the
    /// same read.
    pub async fn create_transaction(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        raw: serde_json::Value,
    ) -> ServiceResult<StockTransaction> {
        let payload: CreateTransactionPayload = payload::parse(raw)?;
        let draft: TransactionDraft = payload.into();
        validate_draft(&draft)?;

        let ctx = authorize_team_scoped(
            &*self.store,
            TeamPermission::StockWrite,
            team_id,
            request_user_id,
        )
        .await?;
        Self::require_entitled(&ctx)?;

        self.resolve_location(team_id, draft.source_location_id)
            .await?;
        self.resolve_location(team_id, draft.destination_location_id)
            .await?;

        let _guard = self.item_locks.acquire(draft.item_id).await;

        // Re-read under the lock; the stock we base the write on must be
        // current.
        let item = self.resolve_item(team_id, draft.item_id).await?;
        let new_stock = apply_effect(item.current_stock, draft.kind, draft.quantity)?;

        let transaction = StockTransaction::from_draft(
            TransactionId::new(),
            team_id,
            ctx.user.id,
            draft,
        );
        self.store
            .commit_transaction(transaction.clone(), new_stock)
            .await
            .map_err(store_err)?;

        info!(
            team_id = %team_id,
            item_id = %transaction.item_id,
            kind = %transaction.kind,
            quantity = transaction.quantity,
            new_stock,
            "stock transaction committed"
        );
        Ok(transaction)
    }

    /// Delete a transaction for corrective workflows, reversing exactly its
    /// effect (never replaying the whole ledger).
    pub async fn delete_transaction(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
        transaction_id: TransactionId,
    ) -> ServiceResult<()> {
        let ctx = authorize_team_scoped(
            &*self.store,
            TeamPermission::TransactionDelete,
            team_id,
            request_user_id,
        )
        .await?;
        Self::require_entitled(&ctx)?;

        let Some(probe) = self
            .store
            .get_transaction(transaction_id)
            .await
            .map_err(store_err)?
        else {
            return Err(DomainError::not_found(EntityKind::Transaction).into());
        };
        if probe.team_id != team_id {
            return Err(DomainError::Forbidden.into());
        }

        let _guard = self.item_locks.acquire(probe.item_id).await;

        // Re-read under the lock; a concurrent delete may have won.
        let Some(transaction) = self
            .store
            .get_transaction(transaction_id)
            .await
            .map_err(store_err)?
        else {
            return Err(DomainError::not_found(EntityKind::Transaction).into());
        };

        let item = self.resolve_item(team_id, transaction.item_id).await?;
        let new_stock =
            reverse_effect(item.current_stock, transaction.kind, transaction.quantity)?;

        self.store
            .revert_transaction(transaction_id, item.id, new_stock)
            .await
            .map_err(store_err)?;

        info!(
            team_id = %team_id,
            item_id = %item.id,
            kind = %transaction.kind,
            quantity = transaction.quantity,
            new_stock,
            "stock transaction reversed"
        );
        Ok(())
    }

    pub async fn list_transactions(
        &self,
        team_id: TeamId,
        request_user_id: Option<UserId>,
    ) -> ServiceResult<Vec<StockTransaction>> {
        let ctx = require_team_member(&*self.store, team_id, request_user_id).await?;
        Self::require_entitled(&ctx)?;
        Ok(self
            .store
            .list_transactions(team_id)
            .await
            .map_err(store_err)?)
    }
}

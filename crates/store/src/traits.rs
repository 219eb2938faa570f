//! Async storage collaborator traits.
//!
//! Each method either fully succeeds or raises a [`StoreError`] the service
//! facade translates; implementations never surface backend-specific text to
//! callers. The read side the authorization gate needs lives in
//! `stockpile_auth::PrincipalStore`; these traits add the write side and the
//! inventory directory/ledger operations.

use async_trait::async_trait;
use std::sync::Arc;

use stockpile_auth::{PrincipalStore, Team, TeamMembership, User};
use stockpile_core::{ItemId, LocationId, TeamId, TransactionId};
use stockpile_inventory::{Item, Location, StockTransaction};

use crate::error::StoreResult;

/// Team/user/membership persistence.
#[async_trait]
pub trait TeamDirectory: PrincipalStore {
    /// Insert a team together with its first admin membership.
    ///
    /// Atomic: a team row is never observable without an admin membership.
    /// `first_admin.team_id` must be `team.id`. Fails with `Conflict` when
    /// the name is taken within the owning company.
    async fn insert_team(&self, team: Team, first_admin: TeamMembership) -> StoreResult<()>;

    /// Replace a team row (rename, billing snapshot refresh).
    async fn update_team(&self, team: Team) -> StoreResult<()>;

    /// Delete a team row. Owned rows are the caller's problem; the facade
    /// refuses deletion while inventory data exists.
    async fn delete_team(&self, team_id: TeamId) -> StoreResult<()>;

    async fn insert_user(&self, user: User) -> StoreResult<()>;

    /// Insert a membership. Fails with `Conflict` when the (team, user) pair
    /// already exists, active or suspended.
    async fn insert_membership(&self, membership: TeamMembership) -> StoreResult<()>;

    /// Replace a membership row (role change, suspension).
    async fn update_membership(&self, membership: TeamMembership) -> StoreResult<()>;

    /// All membership rows of a team, suspended included.
    async fn list_team_memberships(&self, team_id: TeamId) -> StoreResult<Vec<TeamMembership>>;
}

/// Item/location directory and the append-only transaction log.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn get_item(&self, item_id: ItemId) -> StoreResult<Option<Item>>;

    /// Insert an item. Fails with `Conflict` when the barcode is taken
    /// within the team.
    async fn insert_item(&self, item: Item) -> StoreResult<()>;

    async fn delete_item(&self, item_id: ItemId) -> StoreResult<()>;

    async fn item_has_transactions(&self, item_id: ItemId) -> StoreResult<bool>;

    async fn list_items(&self, team_id: TeamId) -> StoreResult<Vec<Item>>;

    /// Exact-match barcode lookup within one team (scan workflow).
    async fn find_item_by_barcode(
        &self,
        team_id: TeamId,
        barcode: &str,
    ) -> StoreResult<Option<Item>>;

    async fn get_location(&self, location_id: LocationId) -> StoreResult<Option<Location>>;

    /// Case-insensitive name lookup within one team.
    async fn find_location_by_name(
        &self,
        team_id: TeamId,
        name: &str,
    ) -> StoreResult<Option<Location>>;

    /// Insert a location. Fails with `Conflict` when the name is taken
    /// within the team.
    async fn insert_location(&self, location: Location) -> StoreResult<()>;

    async fn delete_location(&self, location_id: LocationId) -> StoreResult<()>;

    async fn list_locations(&self, team_id: TeamId) -> StoreResult<Vec<Location>>;

    /// Whether any item's home location or any transaction references the
    /// location.
    async fn location_in_use(&self, location_id: LocationId) -> StoreResult<bool>;

    async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> StoreResult<Option<StockTransaction>>;

    async fn list_transactions(&self, team_id: TeamId) -> StoreResult<Vec<StockTransaction>>;

    /// Persist a ledger entry together with the item's new stock value.
    ///
    /// Atomic: a crash must never be observable as a ledger entry without
    /// its stock update, or vice versa.
    async fn commit_transaction(
        &self,
        transaction: StockTransaction,
        new_stock: i64,
    ) -> StoreResult<()>;

    /// Remove a ledger entry together with the item's reversed stock value.
    /// Atomic, like `commit_transaction`.
    async fn revert_transaction(
        &self,
        transaction_id: TransactionId,
        item_id: ItemId,
        new_stock: i64,
    ) -> StoreResult<()>;
}

#[async_trait]
impl<S> TeamDirectory for Arc<S>
where
    S: TeamDirectory + ?Sized,
{
    async fn insert_team(&self, team: Team, first_admin: TeamMembership) -> StoreResult<()> {
        (**self).insert_team(team, first_admin).await
    }

    async fn update_team(&self, team: Team) -> StoreResult<()> {
        (**self).update_team(team).await
    }

    async fn delete_team(&self, team_id: TeamId) -> StoreResult<()> {
        (**self).delete_team(team_id).await
    }

    async fn insert_user(&self, user: User) -> StoreResult<()> {
        (**self).insert_user(user).await
    }

    async fn insert_membership(&self, membership: TeamMembership) -> StoreResult<()> {
        (**self).insert_membership(membership).await
    }

    async fn update_membership(&self, membership: TeamMembership) -> StoreResult<()> {
        (**self).update_membership(membership).await
    }

    async fn list_team_memberships(&self, team_id: TeamId) -> StoreResult<Vec<TeamMembership>> {
        (**self).list_team_memberships(team_id).await
    }
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn get_item(&self, item_id: ItemId) -> StoreResult<Option<Item>> {
        (**self).get_item(item_id).await
    }

    async fn insert_item(&self, item: Item) -> StoreResult<()> {
        (**self).insert_item(item).await
    }

    async fn delete_item(&self, item_id: ItemId) -> StoreResult<()> {
        (**self).delete_item(item_id).await
    }

    async fn item_has_transactions(&self, item_id: ItemId) -> StoreResult<bool> {
        (**self).item_has_transactions(item_id).await
    }

    async fn list_items(&self, team_id: TeamId) -> StoreResult<Vec<Item>> {
        (**self).list_items(team_id).await
    }

    async fn find_item_by_barcode(
        &self,
        team_id: TeamId,
        barcode: &str,
    ) -> StoreResult<Option<Item>> {
        (**self).find_item_by_barcode(team_id, barcode).await
    }

    async fn get_location(&self, location_id: LocationId) -> StoreResult<Option<Location>> {
        (**self).get_location(location_id).await
    }

    async fn find_location_by_name(
        &self,
        team_id: TeamId,
        name: &str,
    ) -> StoreResult<Option<Location>> {
        (**self).find_location_by_name(team_id, name).await
    }

    async fn insert_location(&self, location: Location) -> StoreResult<()> {
        (**self).insert_location(location).await
    }

    async fn delete_location(&self, location_id: LocationId) -> StoreResult<()> {
        (**self).delete_location(location_id).await
    }

    async fn list_locations(&self, team_id: TeamId) -> StoreResult<Vec<Location>> {
        (**self).list_locations(team_id).await
    }

    async fn location_in_use(&self, location_id: LocationId) -> StoreResult<bool> {
        (**self).location_in_use(location_id).await
    }

    async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> StoreResult<Option<StockTransaction>> {
        (**self).get_transaction(transaction_id).await
    }

    async fn list_transactions(&self, team_id: TeamId) -> StoreResult<Vec<StockTransaction>> {
        (**self).list_transactions(team_id).await
    }

    async fn commit_transaction(
        &self,
        transaction: StockTransaction,
        new_stock: i64,
    ) -> StoreResult<()> {
        (**self).commit_transaction(transaction, new_stock).await
    }

    async fn revert_transaction(
        &self,
        transaction_id: TransactionId,
        item_id: ItemId,
        new_stock: i64,
    ) -> StoreResult<()> {
        (**self)
            .revert_transaction(transaction_id, item_id, new_stock)
            .await
    }
}

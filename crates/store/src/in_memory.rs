//! In-memory storage backend.
//!
//! Intended for tests/dev. Not optimized for performance. All maps live
//! behind a single `RwLock` so `commit_transaction`/`revert_transaction`
//! mutate the ledger and the stock counter under one write guard.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockpile_auth::{PrincipalStore, Team, TeamMembership, User};
use stockpile_core::{
    DomainError, DomainResult, ItemId, LocationId, TeamId, TransactionId, UserId,
};
use stockpile_inventory::{Item, Location, StockTransaction};

use crate::error::{StoreError, StoreResult};
use crate::traits::{InventoryStore, TeamDirectory};

#[derive(Debug, Default)]
struct State {
    teams: HashMap<TeamId, Team>,
    users: HashMap<UserId, User>,
    memberships: HashMap<(TeamId, UserId), TeamMembership>,
    items: HashMap<ItemId, Item>,
    locations: HashMap<LocationId, Location>,
    transactions: HashMap<TransactionId, StockTransaction>,
}

/// In-memory store implementing every collaborator trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))
    }
}

fn to_domain(err: StoreError) -> DomainError {
    DomainError::internal(err.to_string())
}

#[async_trait]
impl PrincipalStore for InMemoryStore {
    async fn get_team(&self, team_id: TeamId) -> DomainResult<Option<Team>> {
        Ok(self.read().map_err(to_domain)?.teams.get(&team_id).cloned())
    }

    async fn get_user(&self, user_id: UserId) -> DomainResult<Option<User>> {
        Ok(self.read().map_err(to_domain)?.users.get(&user_id).cloned())
    }

    async fn get_active_membership(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> DomainResult<Option<TeamMembership>> {
        Ok(self
            .read()
            .map_err(to_domain)?
            .memberships
            .get(&(team_id, user_id))
            .filter(|m| m.is_active())
            .cloned())
    }
}

#[async_trait]
impl TeamDirectory for InMemoryStore {
    async fn insert_team(&self, team: Team, first_admin: TeamMembership) -> StoreResult<()> {
        let mut state = self.write()?;
        let duplicate = state.teams.values().any(|t| {
            t.company_id == team.company_id && t.name.eq_ignore_ascii_case(&team.name)
        });
        if duplicate {
            return Err(StoreError::conflict(format!(
                "team name '{}' already taken",
                team.name
            )));
        }
        // Team row and first admin land under one guard; no observer ever
        // sees a team without an admin membership.
        state
            .memberships
            .insert((team.id, first_admin.user_id), first_admin);
        state.teams.insert(team.id, team);
        Ok(())
    }

    async fn update_team(&self, team: Team) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.teams.contains_key(&team.id) {
            return Err(StoreError::missing_row(format!("team {}", team.id)));
        }
        let duplicate = state.teams.values().any(|t| {
            t.id != team.id
                && t.company_id == team.company_id
                && t.name.eq_ignore_ascii_case(&team.name)
        });
        if duplicate {
            return Err(StoreError::conflict(format!(
                "team name '{}' already taken",
                team.name
            )));
        }
        state.teams.insert(team.id, team);
        Ok(())
    }

    async fn delete_team(&self, team_id: TeamId) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.teams.remove(&team_id).is_none() {
            return Err(StoreError::missing_row(format!("team {team_id}")));
        }
        state.memberships.retain(|(t, _), _| *t != team_id);
        Ok(())
    }

    async fn insert_user(&self, user: User) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.users.contains_key(&user.id) {
            return Err(StoreError::conflict(format!("user {} exists", user.id)));
        }
        state.users.insert(user.id, user);
        Ok(())
    }

    async fn insert_membership(&self, membership: TeamMembership) -> StoreResult<()> {
        let mut state = self.write()?;
        let key = (membership.team_id, membership.user_id);
        if state.memberships.contains_key(&key) {
            return Err(StoreError::conflict("membership pair already exists"));
        }
        state.memberships.insert(key, membership);
        Ok(())
    }

    async fn update_membership(&self, membership: TeamMembership) -> StoreResult<()> {
        let mut state = self.write()?;
        let key = (membership.team_id, membership.user_id);
        if !state.memberships.contains_key(&key) {
            return Err(StoreError::missing_row("membership pair"));
        }
        state.memberships.insert(key, membership);
        Ok(())
    }

    async fn list_team_memberships(&self, team_id: TeamId) -> StoreResult<Vec<TeamMembership>> {
        let state = self.read()?;
        let mut rows: Vec<_> = state
            .memberships
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.created_at);
        Ok(rows)
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    async fn get_item(&self, item_id: ItemId) -> StoreResult<Option<Item>> {
        Ok(self.read()?.items.get(&item_id).cloned())
    }

    async fn insert_item(&self, item: Item) -> StoreResult<()> {
        let mut state = self.write()?;
        let duplicate = state
            .items
            .values()
            .any(|i| i.team_id == item.team_id && i.barcode == item.barcode);
        if duplicate {
            return Err(StoreError::conflict(format!(
                "barcode '{}' already taken in team",
                item.barcode
            )));
        }
        state.items.insert(item.id, item);
        Ok(())
    }

    async fn delete_item(&self, item_id: ItemId) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.items.remove(&item_id).is_none() {
            return Err(StoreError::missing_row(format!("item {item_id}")));
        }
        Ok(())
    }

    async fn item_has_transactions(&self, item_id: ItemId) -> StoreResult<bool> {
        Ok(self
            .read()?
            .transactions
            .values()
            .any(|t| t.item_id == item_id))
    }

    async fn list_items(&self, team_id: TeamId) -> StoreResult<Vec<Item>> {
        let state = self.read()?;
        let mut rows: Vec<_> = state
            .items
            .values()
            .filter(|i| i.team_id == team_id)
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.created_at);
        Ok(rows)
    }

    async fn find_item_by_barcode(
        &self,
        team_id: TeamId,
        barcode: &str,
    ) -> StoreResult<Option<Item>> {
        Ok(self
            .read()?
            .items
            .values()
            .find(|i| i.team_id == team_id && i.barcode == barcode)
            .cloned())
    }

    async fn get_location(&self, location_id: LocationId) -> StoreResult<Option<Location>> {
        Ok(self.read()?.locations.get(&location_id).cloned())
    }

    async fn find_location_by_name(
        &self,
        team_id: TeamId,
        name: &str,
    ) -> StoreResult<Option<Location>> {
        Ok(self
            .read()?
            .locations
            .values()
            .find(|l| l.team_id == team_id && l.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn insert_location(&self, location: Location) -> StoreResult<()> {
        let mut state = self.write()?;
        let duplicate = state.locations.values().any(|l| {
            l.team_id == location.team_id && l.name.eq_ignore_ascii_case(&location.name)
        });
        if duplicate {
            return Err(StoreError::conflict(format!(
                "location name '{}' already taken in team",
                location.name
            )));
        }
        state.locations.insert(location.id, location);
        Ok(())
    }

    async fn delete_location(&self, location_id: LocationId) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.locations.remove(&location_id).is_none() {
            return Err(StoreError::missing_row(format!("location {location_id}")));
        }
        Ok(())
    }

    async fn list_locations(&self, team_id: TeamId) -> StoreResult<Vec<Location>> {
        let state = self.read()?;
        let mut rows: Vec<_> = state
            .locations
            .values()
            .filter(|l| l.team_id == team_id)
            .cloned()
            .collect();
        rows.sort_by_key(|l| l.created_at);
        Ok(rows)
    }

    async fn location_in_use(&self, location_id: LocationId) -> StoreResult<bool> {
        let state = self.read()?;
        let home = state
            .items
            .values()
            .any(|i| i.location_id == Some(location_id));
        let referenced = state.transactions.values().any(|t| {
            t.source_location_id == Some(location_id)
                || t.destination_location_id == Some(location_id)
        });
        Ok(home || referenced)
    }

    async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> StoreResult<Option<StockTransaction>> {
        Ok(self.read()?.transactions.get(&transaction_id).cloned())
    }

    async fn list_transactions(&self, team_id: TeamId) -> StoreResult<Vec<StockTransaction>> {
        let state = self.read()?;
        let mut rows: Vec<_> = state
            .transactions
            .values()
            .filter(|t| t.team_id == team_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.created_at);
        Ok(rows)
    }

    async fn commit_transaction(
        &self,
        transaction: StockTransaction,
        new_stock: i64,
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        let item_id = transaction.item_id;
        // Both writes happen under one guard; no observer sees one without
        // the other.
        let Some(item) = state.items.get_mut(&item_id) else {
            return Err(StoreError::missing_row(format!("item {item_id}")));
        };
        item.current_stock = new_stock;
        state.transactions.insert(transaction.id, transaction);
        Ok(())
    }

    async fn revert_transaction(
        &self,
        transaction_id: TransactionId,
        item_id: ItemId,
        new_stock: i64,
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.transactions.remove(&transaction_id).is_none() {
            return Err(StoreError::missing_row(format!(
                "transaction {transaction_id}"
            )));
        }
        let Some(item) = state.items.get_mut(&item_id) else {
            return Err(StoreError::missing_row(format!("item {item_id}")));
        };
        item.current_stock = new_stock;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockpile_auth::{GlobalRole, MembershipStatus, TeamRole};
    use stockpile_core::EntityKind;
    use stockpile_inventory::{TransactionDraft, TransactionKind};

    fn team(name: &str) -> Team {
        Team::new(TeamId::new(), name, None).unwrap()
    }

    fn admin_of(team: &Team) -> TeamMembership {
        TeamMembership::new(team.id, UserId::new(), TeamRole::Admin)
    }

    #[tokio::test]
    async fn team_names_are_unique_per_company() {
        let store = InMemoryStore::new();
        let first = team("Warehouse");
        let admin = admin_of(&first);
        store.insert_team(first, admin).await.unwrap();

        let second = team("warehouse");
        let second_id = second.id;
        let admin = admin_of(&second);
        let err = store.insert_team(second, admin).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        // The rejected insert leaves no membership behind either.
        assert!(store
            .list_team_memberships(second_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn team_insert_carries_its_first_admin() {
        let store = InMemoryStore::new();
        let new_team = team("Warehouse");
        let team_id = new_team.id;
        let admin = admin_of(&new_team);
        let admin_user = admin.user_id;
        store.insert_team(new_team, admin).await.unwrap();

        let memberships = store.list_team_memberships(team_id).await.unwrap();
        assert_eq!(memberships.len(), 1);
        assert!(memberships[0].is_active_admin());
        assert_eq!(memberships[0].user_id, admin_user);
    }

    #[tokio::test]
    async fn barcodes_are_unique_per_team_only() {
        let store = InMemoryStore::new();
        let team_a = TeamId::new();
        let team_b = TeamId::new();
        let item = |team_id| {
            Item::new(ItemId::new(), team_id, "Widget", "W-1", 0, 0, None).unwrap()
        };

        store.insert_item(item(team_a)).await.unwrap();
        // Same barcode in a different team is fine.
        store.insert_item(item(team_b)).await.unwrap();

        let err = store.insert_item(item(team_a)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn suspended_memberships_are_invisible_to_the_gate() {
        let store = InMemoryStore::new();
        let (team_id, user_id) = (TeamId::new(), UserId::new());
        let mut membership = TeamMembership::new(team_id, user_id, TeamRole::Admin);
        store.insert_membership(membership.clone()).await.unwrap();

        assert!(store
            .get_active_membership(team_id, user_id)
            .await
            .unwrap()
            .is_some());

        membership.status = MembershipStatus::Suspended;
        store.update_membership(membership).await.unwrap();

        assert!(store
            .get_active_membership(team_id, user_id)
            .await
            .unwrap()
            .is_none());
        // The row itself survives for audit attribution.
        assert_eq!(store.list_team_memberships(team_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn commit_updates_ledger_and_stock_together() {
        let store = InMemoryStore::new();
        let team_id = TeamId::new();
        let item = Item::new(ItemId::new(), team_id, "Widget", "W-1", 5, 0, None).unwrap();
        let item_id = item.id;
        store.insert_item(item).await.unwrap();

        let draft = TransactionDraft {
            item_id,
            kind: TransactionKind::StockIn,
            quantity: 3,
            source_location_id: None,
            destination_location_id: None,
            notes: None,
        };
        let tx = StockTransaction::from_draft(
            TransactionId::new(),
            team_id,
            UserId::new(),
            draft,
        );
        let tx_id = tx.id;

        store.commit_transaction(tx, 8).await.unwrap();
        assert_eq!(store.get_item(item_id).await.unwrap().unwrap().current_stock, 8);
        assert!(store.item_has_transactions(item_id).await.unwrap());

        store.revert_transaction(tx_id, item_id, 5).await.unwrap();
        assert_eq!(store.get_item(item_id).await.unwrap().unwrap().current_stock, 5);
        assert!(!store.item_has_transactions(item_id).await.unwrap());
    }

    #[tokio::test]
    async fn reverting_a_missing_transaction_fails() {
        let store = InMemoryStore::new();
        let err = store
            .revert_transaction(TransactionId::new(), ItemId::new(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingRow(_)));
    }

    #[tokio::test]
    async fn barcode_lookup_is_team_scoped() {
        let store = InMemoryStore::new();
        let team_a = TeamId::new();
        let team_b = TeamId::new();
        let item = Item::new(ItemId::new(), team_a, "Widget", "W-1", 0, 0, None).unwrap();
        store.insert_item(item.clone()).await.unwrap();

        let found = store.find_item_by_barcode(team_a, "W-1").await.unwrap();
        assert_eq!(found.as_ref().map(|i| i.id), Some(item.id));
        assert!(store.find_item_by_barcode(team_b, "W-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn location_name_lookup_ignores_case() {
        let store = InMemoryStore::new();
        let team_id = TeamId::new();
        let location = Location::new(LocationId::new(), team_id, "Shelf A").unwrap();
        store.insert_location(location.clone()).await.unwrap();

        let found = store.find_location_by_name(team_id, "shelf a").await.unwrap();
        assert_eq!(found.map(|l| l.id), Some(location.id));
    }

    #[tokio::test]
    async fn location_in_use_covers_home_and_ledger_references() {
        let store = InMemoryStore::new();
        let team_id = TeamId::new();
        let location = Location::new(LocationId::new(), team_id, "Shelf A").unwrap();
        let location_id = location.id;
        store.insert_location(location).await.unwrap();
        assert!(!store.location_in_use(location_id).await.unwrap());

        let item = Item::new(
            ItemId::new(),
            team_id,
            "Widget",
            "W-1",
            0,
            0,
            Some(location_id),
        )
        .unwrap();
        store.insert_item(item).await.unwrap();
        assert!(store.location_in_use(location_id).await.unwrap());
    }

    #[tokio::test]
    async fn gate_errors_use_domain_vocabulary() {
        let store = InMemoryStore::new();
        let user = User::new(UserId::new(), GlobalRole::Viewer, "hash");
        store.insert_user(user.clone()).await.unwrap();

        // Round-trip through the gate's trait to make sure the store speaks
        // its vocabulary.
        let err = stockpile_auth::authorize_team_scoped(
            &store,
            stockpile_auth::TeamPermission::ItemWrite,
            TeamId::new(),
            Some(user.id),
        )
        .await
        .unwrap_err();
        assert_eq!(err, DomainError::NotFound(EntityKind::Team));
    }
}

//! Inventory item entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockpile_core::{DomainError, DomainResult, Entity, ItemId, LocationId, TeamId};

/// An inventory item.
///
/// # Invariants
/// - `team_id` is immutable after creation.
/// - `barcode` is unique within the team (enforced by storage).
/// - `current_stock` is derived state owned by the ledger: it equals the
///   initial quantity plus the signed sum of all the item's transactions'
///   effects, in creation order. No other code path writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub team_id: TeamId,
    pub name: String,
    pub barcode: String,
    pub current_stock: i64,
    pub minimum_stock: i64,
    /// Nullable "home" location.
    pub location_id: Option<LocationId>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn new(
        id: ItemId,
        team_id: TeamId,
        name: impl Into<String>,
        barcode: impl Into<String>,
        initial_quantity: i64,
        minimum_stock: i64,
        location_id: Option<LocationId>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let barcode = barcode.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if barcode.trim().is_empty() {
            return Err(DomainError::validation("barcode cannot be empty"));
        }
        if initial_quantity < 0 {
            return Err(DomainError::validation("initial quantity cannot be negative"));
        }
        if minimum_stock < 0 {
            return Err(DomainError::validation("minimum stock cannot be negative"));
        }

        Ok(Self {
            id,
            team_id,
            name,
            barcode,
            current_stock: initial_quantity,
            minimum_stock,
            location_id,
            created_at: Utc::now(),
        })
    }

    /// Whether stock has fallen below the reorder threshold.
    pub fn is_below_minimum(&self) -> bool {
        self.current_stock < self.minimum_stock
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

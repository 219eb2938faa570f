//! Stock transaction: one immutable ledger entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockpile_core::{Entity, ItemId, LocationId, TeamId, TransactionId, UserId};

/// Kind of stock movement. Direction is implied by the kind; the stored
/// quantity is an unsigned magnitude except for `Adjust` (signed delta) and
/// `Count` (absolute value).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    StockIn,
    StockOut,
    Adjust,
    Move,
    Count,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::StockIn => "stock_in",
            TransactionKind::StockOut => "stock_out",
            TransactionKind::Adjust => "adjust",
            TransactionKind::Move => "move",
            TransactionKind::Count => "count",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A not-yet-persisted transaction, as submitted by a caller.
///
/// Location meaning depends on the kind: `None` is the default/unassigned
/// bucket, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub item_id: ItemId,
    pub kind: TransactionKind,
    pub quantity: i64,
    pub source_location_id: Option<LocationId>,
    pub destination_location_id: Option<LocationId>,
    pub notes: Option<String>,
}

/// One committed ledger entry. Immutable once created; corrections are new
/// transactions, not edits.
///
/// `team_id` is denormalized for query performance; the item's `team_id` is
/// authoritative and re-validated at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: TransactionId,
    pub team_id: TeamId,
    pub item_id: ItemId,
    pub kind: TransactionKind,
    pub quantity: i64,
    pub source_location_id: Option<LocationId>,
    pub destination_location_id: Option<LocationId>,
    /// Actor attribution.
    pub user_id: UserId,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StockTransaction {
    pub fn from_draft(
        id: TransactionId,
        team_id: TeamId,
        user_id: UserId,
        draft: TransactionDraft,
    ) -> Self {
        Self {
            id,
            team_id,
            item_id: draft.item_id,
            kind: draft.kind,
            quantity: draft.quantity,
            source_location_id: draft.source_location_id,
            destination_location_id: draft.destination_location_id,
            user_id,
            notes: draft.notes,
            created_at: Utc::now(),
        }
    }
}

impl Entity for StockTransaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

//! Payload contract layer.
//!
//! Inbound payloads arrive untyped (`serde_json::Value`); nothing past this
//! module ever sees untyped data. Field names are camelCase on the wire,
//! unknown fields are rejected.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use stockpile_core::{CompanyId, DomainError, DomainResult, ItemId, LocationId, UserId};
use stockpile_inventory::{TransactionDraft, TransactionKind};
use stockpile_auth::TeamRole;

/// Deserialize and shape-check an untyped payload.
pub fn parse<T: DeserializeOwned>(value: serde_json::Value) -> DomainResult<T> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::validation(format!("invalid payload: {e}")))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTeamPayload {
    pub name: String,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTeamPayload {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateItemPayload {
    pub name: String,
    pub barcode: String,
    pub initial_quantity: i64,
    #[serde(default)]
    pub minimum_stock: i64,
    #[serde(default)]
    pub location_id: Option<LocationId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateLocationPayload {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTransactionPayload {
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub quantity: i64,
    #[serde(default)]
    pub source_location_id: Option<LocationId>,
    #[serde(default)]
    pub destination_location_id: Option<LocationId>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateTransactionPayload> for TransactionDraft {
    fn from(payload: CreateTransactionPayload) -> Self {
        TransactionDraft {
            item_id: payload.item_id,
            kind: payload.kind,
            quantity: payload.quantity,
            source_location_id: payload.source_location_id,
            destination_location_id: payload.destination_location_id,
            notes: payload.notes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemberRolePayload {
    pub user_id: UserId,
    pub role: TeamRole,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemberUserPayload {
    pub user_id: UserId,
}

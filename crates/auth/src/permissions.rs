//! Permission identifiers.
//!
//! Permissions are closed enums rather than opaque strings: the matrix is
//! fixed at compile time, and adding a permission is a code change.

use serde::{Deserialize, Serialize};

/// Permissions evaluated against a user's global role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalPermission {
    TeamCreate,
}

/// Permissions evaluated against a user's team membership role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamPermission {
    TeamUpdate,
    TeamDelete,
    ItemWrite,
    ItemDelete,
    LocationWrite,
    LocationDelete,
    StockWrite,
    TransactionDelete,
}

impl GlobalPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            GlobalPermission::TeamCreate => "team:create",
        }
    }
}

impl TeamPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamPermission::TeamUpdate => "team:update",
            TeamPermission::TeamDelete => "team:delete",
            TeamPermission::ItemWrite => "item:write",
            TeamPermission::ItemDelete => "item:delete",
            TeamPermission::LocationWrite => "location:write",
            TeamPermission::LocationDelete => "location:delete",
            TeamPermission::StockWrite => "stock:write",
            TeamPermission::TransactionDelete => "transaction:delete",
        }
    }
}

impl core::fmt::Display for GlobalPermission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for TeamPermission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

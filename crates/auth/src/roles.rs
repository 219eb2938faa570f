//! Role tiers for the two-tier permission model.

use serde::{Deserialize, Serialize};

use stockpile_core::DomainError;

/// System-wide role of a user, independent of any team.
///
/// Governs cross-team actions such as team creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    Admin,
    Operator,
    Viewer,
    SuperAdmin,
}

/// A user's permission tier within one specific team.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Admin,
    Operator,
    Viewer,
}

impl GlobalRole {
    pub fn as_str(self) -> &'static str {
        match self {
            GlobalRole::Admin => "admin",
            GlobalRole::Operator => "operator",
            GlobalRole::Viewer => "viewer",
            GlobalRole::SuperAdmin => "super_admin",
        }
    }
}

impl TeamRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamRole::Admin => "admin",
            TeamRole::Operator => "operator",
            TeamRole::Viewer => "viewer",
        }
    }
}

impl core::fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TeamRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(TeamRole::Admin),
            "operator" => Ok(TeamRole::Operator),
            "viewer" => Ok(TeamRole::Viewer),
            other => Err(DomainError::validation(format!(
                "unknown team role '{other}'"
            ))),
        }
    }
}

impl core::str::FromStr for GlobalRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(GlobalRole::Admin),
            "operator" => Ok(GlobalRole::Operator),
            "viewer" => Ok(GlobalRole::Viewer),
            "super_admin" => Ok(GlobalRole::SuperAdmin),
            other => Err(DomainError::validation(format!(
                "unknown global role '{other}'"
            ))),
        }
    }
}

//! Team entity: the multi-tenant boundary that owns all inventory data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockpile_billing::BillingSnapshot;
use stockpile_core::{CompanyId, DomainError, DomainResult, Entity, TeamId};

/// A team owns Items, Locations, Transactions and Memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// Unique within the owning company.
    pub name: String,
    pub company_id: Option<CompanyId>,
    pub billing: BillingSnapshot,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, company_id: Option<CompanyId>) -> DomainResult<Self> {
        let name = name.into();
        validate_team_name(&name)?;
        Ok(Self {
            id,
            name,
            company_id,
            billing: BillingSnapshot::default(),
            created_at: Utc::now(),
        })
    }

    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        validate_team_name(&name)?;
        self.name = name;
        Ok(())
    }
}

pub(crate) fn validate_team_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("team name cannot be empty"));
    }
    Ok(())
}

impl Entity for Team {
    type Id = TeamId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

//! Stock location entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockpile_core::{DomainError, DomainResult, Entity, LocationId, TeamId};

/// A named place stock lives in. Referenced by items (home location) and by
/// transactions (source/destination). Name is unique within the team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub team_id: TeamId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(id: LocationId, team_id: TeamId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("location name cannot be empty"));
        }
        Ok(Self {
            id,
            team_id,
            name,
            created_at: Utc::now(),
        })
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

//! Scenario Request/Response Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::permissions::{ResourceAccess, ResourcePermissions, TeamGrant};

#[derive(Debug, FromRow)]
pub struct ScenarioRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ScenarioResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub url: String,
    pub owner_id: Uuid,
    pub is_owner: bool,
    pub permissions: ResourcePermissions,
    pub teams: Vec<TeamGrant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScenarioResponse {
    #[must_use]
    pub fn from_parts(row: ScenarioRow, access: ResourceAccess) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            url: row.url,
            owner_id: access.owner_id,
            is_owner: access.is_owner,
            permissions: access.permissions,
            teams: access.grants,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct ScenarioRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    /// Teams to share the new scenario with. Ignored on update.
    #[serde(default)]
    pub teams: Vec<Uuid>,
}

//! Group Request/Response Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::permissions::{ResourceAccess, ResourcePermissions, TeamGrant};

#[derive(Debug, FromRow)]
pub struct GroupRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct TargetRow {
    pub id: Uuid,
    pub group_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TargetResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
}

impl From<TargetRow> for TargetResponse {
    fn from(row: TargetRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            position: row.position,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub targets: Vec<TargetResponse>,
    pub owner_id: Uuid,
    pub is_owner: bool,
    pub permissions: ResourcePermissions,
    pub teams: Vec<TeamGrant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupResponse {
    #[must_use]
    pub fn from_parts(row: GroupRow, targets: Vec<TargetRow>, access: ResourceAccess) -> Self {
        Self {
            id: row.id,
            name: row.name,
            targets: targets.into_iter().map(TargetResponse::from).collect(),
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
pub struct TargetRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct GroupRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub targets: Vec<TargetRequest>,
    /// Teams to share the new group with. Ignored on update.
    #[serde(default)]
    pub teams: Vec<Uuid>,
}

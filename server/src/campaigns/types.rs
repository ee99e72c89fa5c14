//! Campaign Request/Response Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::permissions::{ResourceAccess, ResourcePermissions, TeamGrant};

/// Lifecycle states a campaign moves through.
pub const STATUS_SCHEDULED: &str = "Scheduled";
pub const STATUS_IN_PROGRESS: &str = "In progress";
pub const STATUS_COMPLETED: &str = "Completed";

#[derive(Debug, FromRow)]
pub struct CampaignRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub status: String,
    pub url: String,
    pub launch_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CampaignResponse {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub url: String,
    pub launch_date: DateTime<Utc>,
    pub owner_id: Uuid,
    pub is_owner: bool,
    /// What the requesting user may do with this campaign.
    pub permissions: ResourcePermissions,
    /// Teams the campaign is shared with.
    pub teams: Vec<TeamGrant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignResponse {
    #[must_use]
    pub fn from_parts(row: CampaignRow, access: ResourceAccess) -> Self {
        Self {
            id: row.id,
            name: row.name,
            status: row.status,
            url: row.url,
            launch_date: row.launch_date,
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
pub struct CampaignRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Defaults to now, which launches the campaign immediately.
    pub launch_date: Option<DateTime<Utc>>,
    /// Teams to share the new campaign with. Ignored on update; shares are
    /// managed through the dedicated teams route.
    #[serde(default)]
    pub teams: Vec<Uuid>,
}

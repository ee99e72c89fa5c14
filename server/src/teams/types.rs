//! Team Request/Response Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, FromRow)]
pub struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct TeamMemberRow {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeamMemberResponse {
    pub id: Uuid,
    pub username: String,
    /// Role slug. Passed through unparsed so rosters written by a newer
    /// server version still render.
    pub role: String,
}

impl From<TeamMemberRow> for TeamMemberResponse {
    fn from(row: TeamMemberRow) -> Self {
        Self {
            id: row.user_id,
            username: row.username,
            role: row.role,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub users: Vec<TeamMemberResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamResponse {
    #[must_use]
    pub fn from_parts(team: TeamRow, members: Vec<TeamMemberRow>) -> Self {
        Self {
            id: team.id,
            name: team.name,
            description: team.description,
            users: members.into_iter().map(TeamMemberResponse::from).collect(),
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

// ============================================================================
// API Request Types
// ============================================================================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TeamMemberRequest {
    pub id: Uuid,
    /// Role slug; must be one of the assignable roles.
    pub role: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct TeamRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub users: Vec<TeamMemberRequest>,
}

//! Database models for the permission system.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One member's role within a team a resource is shared with.
///
/// The role stays an unparsed slug here: rows written by a newer server
/// version must still load, and the resolver decides what an unknown slug
/// means.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TeamMemberRole {
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

/// A team a resource is shared with, together with its membership roster.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TeamGrant {
    pub team_id: Uuid,
    pub name: String,
    pub members: Vec<TeamMemberRole>,
}

impl TeamGrant {
    /// Whether the given user appears in this team's roster at all,
    /// regardless of role.
    #[must_use]
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }
}

/// Flat row produced by the grant queries; grouped into [`TeamGrant`]s.
#[derive(Debug, FromRow)]
pub struct GrantRow {
    pub resource_id: Uuid,
    pub team_id: Uuid,
    pub team_name: String,
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

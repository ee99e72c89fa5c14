//! Team roles.
//!
//! A role is scoped to a single (team, user) pairing, never to a user
//! globally. The set is closed: anything outside it resolves to no
//! privilege instead of failing.

use serde::{Deserialize, Serialize};

use super::resolver::ResourcePermissions;

/// Role a user holds within one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Full control over resources shared with the team.
    TeamAdmin,
    /// May edit shared resources, but not delete them.
    Contributor,
    /// Read-only access to shared resources.
    Viewer,
}

impl TeamRole {
    /// All assignable roles, highest privilege first.
    pub const ALL: [Self; 3] = [Self::TeamAdmin, Self::Contributor, Self::Viewer];

    /// Parse a stored role slug. Returns `None` for anything outside the
    /// closed set; callers decide how to surface that.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "team_admin" => Some(Self::TeamAdmin),
            "contributor" => Some(Self::Contributor),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// The slug stored in the database and used on the wire.
    #[must_use]
    pub const fn as_slug(self) -> &'static str {
        match self {
            Self::TeamAdmin => "team_admin",
            Self::Contributor => "contributor",
            Self::Viewer => "viewer",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::TeamAdmin => "Team Leader",
            Self::Contributor => "Contributor",
            Self::Viewer => "Viewer",
        }
    }

    /// The resource permissions this role contributes.
    #[must_use]
    pub const fn grants(self) -> ResourcePermissions {
        match self {
            Self::TeamAdmin => ResourcePermissions::ALL,
            Self::Contributor => ResourcePermissions {
                can_edit: true,
                can_delete: false,
            },
            Self::Viewer => ResourcePermissions::NONE,
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for role in TeamRole::ALL {
            assert_eq!(TeamRole::from_slug(role.as_slug()), Some(role));
        }
    }

    #[test]
    fn test_unknown_slug_rejected() {
        assert_eq!(TeamRole::from_slug("admin"), None);
        assert_eq!(TeamRole::from_slug("TEAM_ADMIN"), None);
        assert_eq!(TeamRole::from_slug(""), None);
    }

    #[test]
    fn test_grants_ordering() {
        // Higher roles grant strictly more.
        assert!(TeamRole::TeamAdmin.grants().can_edit);
        assert!(TeamRole::TeamAdmin.grants().can_delete);
        assert!(TeamRole::Contributor.grants().can_edit);
        assert!(!TeamRole::Contributor.grants().can_delete);
        assert_eq!(TeamRole::Viewer.grants(), ResourcePermissions::NONE);
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&TeamRole::TeamAdmin).unwrap();
        assert_eq!(json, "\"team_admin\"");
        let parsed: TeamRole = serde_json::from_str("\"contributor\"").unwrap();
        assert_eq!(parsed, TeamRole::Contributor);
    }
}

//! Resource sharing.
//!
//! Campaigns, groups, and scenarios are owned by a single user and can be
//! shared with any number of teams through one polymorphic join table.

pub mod queries;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of the per-resource share routes: the full set of teams the
/// resource should be shared with.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ShareRequest {
    pub teams: Vec<Uuid>,
}

/// Kind discriminator for the `resource_teams` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Campaigns,
    Groups,
    Scenarios,
}

impl ResourceKind {
    /// Value stored in the `resource_kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Campaigns => "campaigns",
            Self::Groups => "groups",
            Self::Scenarios => "scenarios",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_column_values() {
        assert_eq!(ResourceKind::Campaigns.as_str(), "campaigns");
        assert_eq!(ResourceKind::Groups.as_str(), "groups");
        assert_eq!(ResourceKind::Scenarios.as_str(), "scenarios");
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&ResourceKind::Scenarios).unwrap();
        assert_eq!(json, "\"scenarios\"");
    }
}

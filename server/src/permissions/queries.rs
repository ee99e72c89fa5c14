//! Database queries for the permission system.
//!
//! Loads the team grants (team + membership roster) attached to shared
//! resources. Everything the resolver needs is fetched in one query to
//! keep list endpoints free of per-row lookups.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::models::{GrantRow, TeamGrant, TeamMemberRole};
use crate::sharing::ResourceKind;

const GRANT_QUERY: &str = r"
    SELECT rt.resource_id,
           t.id AS team_id, t.name AS team_name,
           tm.user_id, u.username, tm.role
    FROM resource_teams rt
    JOIN teams t ON t.id = rt.team_id
    JOIN team_members tm ON tm.team_id = t.id
    JOIN users u ON u.id = tm.user_id
    WHERE rt.resource_kind = $1 AND rt.resource_id = ANY($2)
    ORDER BY t.name, u.username
";

/// Fetch the team grants for a single resource.
#[tracing::instrument(skip(pool))]
pub async fn fetch_resource_grants(
    pool: &PgPool,
    kind: ResourceKind,
    resource_id: Uuid,
) -> sqlx::Result<Vec<TeamGrant>> {
    let mut by_resource = fetch_grants_for_resources(pool, kind, &[resource_id]).await?;
    Ok(by_resource.remove(&resource_id).unwrap_or_default())
}

/// Fetch team grants for a set of resources in one round trip.
///
/// Resources with no shares are absent from the returned map.
#[tracing::instrument(skip(pool, resource_ids), fields(count = resource_ids.len()))]
pub async fn fetch_grants_for_resources(
    pool: &PgPool,
    kind: ResourceKind,
    resource_ids: &[Uuid],
) -> sqlx::Result<HashMap<Uuid, Vec<TeamGrant>>> {
    if resource_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<GrantRow> = sqlx::query_as(GRANT_QUERY)
        .bind(kind.as_str())
        .bind(resource_ids)
        .fetch_all(pool)
        .await?;

    Ok(group_grant_rows(rows))
}

/// Group flat (resource, team, member) rows into per-resource grant lists.
fn group_grant_rows(rows: Vec<GrantRow>) -> HashMap<Uuid, Vec<TeamGrant>> {
    let mut by_resource: HashMap<Uuid, Vec<TeamGrant>> = HashMap::new();

    for row in rows {
        let grants = by_resource.entry(row.resource_id).or_default();
        let member = TeamMemberRole {
            user_id: row.user_id,
            username: row.username,
            role: row.role,
        };
        match grants.last_mut() {
            Some(team) if team.team_id == row.team_id => team.members.push(member),
            _ => grants.push(TeamGrant {
                team_id: row.team_id,
                name: row.team_name,
                members: vec![member],
            }),
        }
    }

    by_resource
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(resource_id: Uuid, team_id: Uuid, team_name: &str, role: &str) -> GrantRow {
        GrantRow {
            resource_id,
            team_id,
            team_name: team_name.to_string(),
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_group_grant_rows_collapses_members() {
        let resource = Uuid::new_v4();
        let team = Uuid::new_v4();
        let rows = vec![
            row(resource, team, "Blue Team", "viewer"),
            row(resource, team, "Blue Team", "team_admin"),
        ];

        let grouped = group_grant_rows(rows);
        let grants = &grouped[&resource];
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].members.len(), 2);
    }

    #[test]
    fn test_group_grant_rows_splits_teams_and_resources() {
        let resource_a = Uuid::new_v4();
        let resource_b = Uuid::new_v4();
        let rows = vec![
            row(resource_a, Uuid::new_v4(), "Blue Team", "viewer"),
            row(resource_a, Uuid::new_v4(), "Red Team", "contributor"),
            row(resource_b, Uuid::new_v4(), "Blue Team", "viewer"),
        ];

        let grouped = group_grant_rows(rows);
        assert_eq!(grouped[&resource_a].len(), 2);
        assert_eq!(grouped[&resource_b].len(), 1);
    }

    #[test]
    fn test_group_grant_rows_empty() {
        assert!(group_grant_rows(Vec::new()).is_empty());
    }
}

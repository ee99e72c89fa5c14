//! Queries for the polymorphic resource/team share table.
//!
//! The mutating queries run on a caller-supplied connection so a handler
//! can commit them atomically with the resource row they belong to.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::ResourceKind;

/// Sorted, duplicate-free copy of a client-supplied id list.
fn unique_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Replace a resource's share list with the given set of teams.
///
/// Shares no longer in the set are removed and new ones inserted; existing
/// rows keep their `shared_at`. Runs on the caller's transaction.
#[tracing::instrument(skip(conn))]
pub async fn replace_resource_teams(
    conn: &mut PgConnection,
    kind: ResourceKind,
    resource_id: Uuid,
    team_ids: &[Uuid],
) -> sqlx::Result<()> {
    sqlx::query(
        r"
        DELETE FROM resource_teams
        WHERE resource_kind = $1 AND resource_id = $2 AND team_id <> ALL($3)
        ",
    )
    .bind(kind.as_str())
    .bind(resource_id)
    .bind(team_ids)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r"
        INSERT INTO resource_teams (resource_kind, resource_id, team_id)
        SELECT $1, $2, team_id FROM UNNEST($3::uuid[]) AS t(team_id)
        ON CONFLICT DO NOTHING
        ",
    )
    .bind(kind.as_str())
    .bind(resource_id)
    .bind(team_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Check that every id refers to an existing team.
///
/// Duplicated ids count once, matching the `ON CONFLICT DO NOTHING`
/// tolerance of the share insert.
pub async fn all_teams_exist(pool: &PgPool, team_ids: &[Uuid]) -> sqlx::Result<bool> {
    let unique = unique_ids(team_ids);
    if unique.is_empty() {
        return Ok(true);
    }
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM teams WHERE id = ANY($1)")
        .bind(&unique)
        .fetch_one(pool)
        .await?;
    Ok(count.0 == unique.len() as i64)
}

/// Remove every share row for a resource. Runs on the caller's
/// transaction so the share rows vanish together with the resource itself
/// (the join table has no FK to the per-kind tables).
pub async fn delete_resource_shares(
    conn: &mut PgConnection,
    kind: ResourceKind,
    resource_id: Uuid,
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM resource_teams WHERE resource_kind = $1 AND resource_id = $2")
        .bind(kind.as_str())
        .bind(resource_id)
        .execute(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_collapse() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let unique = unique_ids(&[a, b, a, a, b]);
        assert_eq!(unique.len(), 2);
        assert!(unique.contains(&a));
        assert!(unique.contains(&b));
    }

    #[test]
    fn test_empty_list_stays_empty() {
        assert!(unique_ids(&[]).is_empty());
    }
}

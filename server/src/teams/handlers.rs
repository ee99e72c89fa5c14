//! Team HTTP Handlers
//!
//! CRUD for teams and their member rosters. Member updates use diff
//! semantics: members absent from the request are removed, existing ones
//! get their role updated, new ones are inserted.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::permissions::TeamRole;

use super::error::TeamError;
use super::types::{TeamMemberRow, TeamRequest, TeamResponse, TeamRow};

const MEMBER_QUERY: &str = r"
    SELECT tm.team_id, tm.user_id, u.username, tm.role
    FROM team_members tm
    JOIN users u ON u.id = tm.user_id
    WHERE tm.team_id = ANY($1)
    ORDER BY u.username
";

/// Validate a team request and return the normalized member list.
fn validate_request(request: &TeamRequest) -> Result<Vec<(Uuid, TeamRole)>, TeamError> {
    if request.name.trim().is_empty() {
        return Err(TeamError::NameRequired);
    }
    request
        .validate()
        .map_err(|_| TeamError::NameRequired)?;
    if request.users.is_empty() {
        return Err(TeamError::NoMembersSpecified);
    }

    // Last occurrence wins for duplicated user ids.
    let mut members: HashMap<Uuid, TeamRole> = HashMap::new();
    for user in &request.users {
        let role = TeamRole::from_slug(&user.role)
            .ok_or_else(|| TeamError::UnknownRole(user.role.clone()))?;
        members.insert(user.id, role);
    }
    Ok(members.into_iter().collect())
}

/// Check that every requested member refers to an existing user.
async fn verify_members_exist(
    state: &AppState,
    members: &[(Uuid, TeamRole)],
) -> Result<(), TeamError> {
    let ids: Vec<Uuid> = members.iter().map(|(id, _)| *id).collect();
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = ANY($1)")
        .bind(&ids)
        .fetch_one(&state.db)
        .await?;
    if count.0 != ids.len() as i64 {
        return Err(TeamError::UnknownMember);
    }
    Ok(())
}

async fn fetch_members(
    state: &AppState,
    team_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<TeamMemberRow>>, TeamError> {
    let rows: Vec<TeamMemberRow> = sqlx::query_as(MEMBER_QUERY)
        .bind(team_ids)
        .fetch_all(&state.db)
        .await?;

    let mut by_team: HashMap<Uuid, Vec<TeamMemberRow>> = HashMap::new();
    for row in rows {
        by_team.entry(row.team_id).or_default().push(row);
    }
    Ok(by_team)
}

fn map_unique_violation(err: sqlx::Error) -> TeamError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            TeamError::DuplicateName
        }
        other => TeamError::Database(other),
    }
}

// ============================================================================
// Team CRUD
// ============================================================================

/// List all teams with their member rosters.
///
/// GET /api/teams
#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "teams",
    responses(
        (status = 200, body = Vec<TeamResponse>),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn list_teams(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<TeamResponse>>, TeamError> {
    let teams: Vec<TeamRow> = sqlx::query_as("SELECT * FROM teams ORDER BY name")
        .fetch_all(&state.db)
        .await?;

    let ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
    let mut members = fetch_members(&state, &ids).await?;

    Ok(Json(
        teams
            .into_iter()
            .map(|t| {
                let roster = members.remove(&t.id).unwrap_or_default();
                TeamResponse::from_parts(t, roster)
            })
            .collect(),
    ))
}

/// Create a new team.
///
/// POST /api/teams
#[utoipa::path(
    post,
    path = "/api/teams",
    tag = "teams",
    request_body = TeamRequest,
    responses(
        (status = 201, body = TeamResponse),
        (status = 400, description = "Invalid name, role, or member list"),
        (status = 409, description = "Team name already taken"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request), fields(name = %request.name))]
pub async fn create_team(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Json(request): Json<TeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), TeamError> {
    let members = validate_request(&request)?;
    verify_members_exist(&state, &members).await?;

    let mut tx = state.db.begin().await?;

    let team: TeamRow = sqlx::query_as(
        r"
        INSERT INTO teams (name, description)
        VALUES ($1, $2)
        RETURNING *
        ",
    )
    .bind(request.name.trim())
    .bind(&request.description)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_unique_violation)?;

    for (user_id, role) in &members {
        sqlx::query("INSERT INTO team_members (team_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(team.id)
            .bind(user_id)
            .bind(role.as_slug())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    let roster = fetch_members(&state, &[team.id])
        .await?
        .remove(&team.id)
        .unwrap_or_default();

    tracing::info!(team_id = %team.id, members = members.len(), "team created");

    Ok((
        StatusCode::CREATED,
        Json(TeamResponse::from_parts(team, roster)),
    ))
}

/// Get a single team.
///
/// GET /api/teams/{id}
#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, body = TeamResponse),
        (status = 404, description = "Team not found"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn get_team(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<TeamResponse>, TeamError> {
    let team: TeamRow = sqlx::query_as("SELECT * FROM teams WHERE id = $1")
        .bind(team_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(TeamError::NotFound)?;

    let roster = fetch_members(&state, &[team_id])
        .await?
        .remove(&team_id)
        .unwrap_or_default();

    Ok(Json(TeamResponse::from_parts(team, roster)))
}

/// Update a team's details and member roster.
///
/// PUT /api/teams/{id}
#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Team ID")),
    request_body = TeamRequest,
    responses(
        (status = 200, body = TeamResponse),
        (status = 400, description = "Invalid name, role, or member list"),
        (status = 404, description = "Team not found"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_team(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(team_id): Path<Uuid>,
    Json(request): Json<TeamRequest>,
) -> Result<Json<TeamResponse>, TeamError> {
    let members = validate_request(&request)?;
    verify_members_exist(&state, &members).await?;

    let mut tx = state.db.begin().await?;

    let team: TeamRow = sqlx::query_as(
        r"
        UPDATE teams
        SET name = $2, description = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(team_id)
    .bind(request.name.trim())
    .bind(&request.description)
    .fetch_optional(&mut *tx)
    .await
    .map_err(map_unique_violation)?
    .ok_or(TeamError::NotFound)?;

    // Remove members no longer in the roster.
    let keep: Vec<Uuid> = members.iter().map(|(id, _)| *id).collect();
    sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id <> ALL($2)")
        .bind(team_id)
        .bind(&keep)
        .execute(&mut *tx)
        .await?;

    // Insert new members, update roles of existing ones.
    for (user_id, role) in &members {
        sqlx::query(
            r"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, user_id) DO UPDATE SET role = EXCLUDED.role
            ",
        )
        .bind(team_id)
        .bind(user_id)
        .bind(role.as_slug())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let roster = fetch_members(&state, &[team_id])
        .await?
        .remove(&team_id)
        .unwrap_or_default();

    Ok(Json(TeamResponse::from_parts(team, roster)))
}

/// Delete a team.
///
/// Membership and share rows cascade with it.
///
/// DELETE /api/teams/{id}
#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 404, description = "Team not found"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn delete_team(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<StatusCode, TeamError> {
    let result = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(team_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(TeamError::NotFound);
    }

    tracing::info!(%team_id, "team deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams::types::TeamMemberRequest;

    fn request(name: &str, users: Vec<(Uuid, &str)>) -> TeamRequest {
        TeamRequest {
            name: name.to_string(),
            description: String::new(),
            users: users
                .into_iter()
                .map(|(id, role)| TeamMemberRequest {
                    id,
                    role: role.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let req = request("   ", vec![(Uuid::new_v4(), "viewer")]);
        assert!(matches!(validate_request(&req), Err(TeamError::NameRequired)));
    }

    #[test]
    fn test_validate_rejects_empty_roster() {
        let req = request("Red Team", vec![]);
        assert!(matches!(
            validate_request(&req),
            Err(TeamError::NoMembersSpecified)
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_role() {
        let req = request("Red Team", vec![(Uuid::new_v4(), "warlord")]);
        match validate_request(&req) {
            Err(TeamError::UnknownRole(slug)) => assert_eq!(slug, "warlord"),
            other => panic!("expected UnknownRole, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_dedupes_members_last_wins() {
        let user = Uuid::new_v4();
        let req = request("Red Team", vec![(user, "viewer"), (user, "team_admin")]);
        let members = validate_request(&req).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0], (user, TeamRole::TeamAdmin));
    }
}

//! Group HTTP Handlers
//!
//! Groups are target rosters for campaigns. Targets are replaced wholesale
//! on update; the client always sends the full roster.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgConnection;
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::permissions::{compute_access, fetch_grants_for_resources, load_resource_access};
use crate::sharing::queries::{all_teams_exist, delete_resource_shares, replace_resource_teams};
use crate::sharing::{ResourceKind, ShareRequest};

use super::error::GroupError;
use super::types::{GroupRequest, GroupResponse, GroupRow, TargetRequest, TargetRow};

const KIND: ResourceKind = ResourceKind::Groups;

fn validate_request(request: &GroupRequest) -> Result<(), GroupError> {
    if request.name.trim().is_empty() {
        return Err(GroupError::NameRequired);
    }
    request.validate().map_err(|_| GroupError::NameRequired)?;
    if request.targets.is_empty() {
        return Err(GroupError::NoTargetsSpecified);
    }
    for target in &request.targets {
        if target.validate().is_err() {
            return Err(GroupError::InvalidTargetEmail(target.email.clone()));
        }
    }
    Ok(())
}

async fn load_group(
    state: &AppState,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<(GroupRow, crate::permissions::ResourceAccess), GroupError> {
    let row: GroupRow = sqlx::query_as("SELECT * FROM groups WHERE id = $1")
        .bind(group_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(GroupError::NotFound)?;

    let access = load_resource_access(&state.db, KIND, group_id, row.user_id, user_id).await?;
    access.require_view()?;
    Ok((row, access))
}

async fn fetch_targets(
    state: &AppState,
    group_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<TargetRow>>, GroupError> {
    let rows: Vec<TargetRow> = sqlx::query_as(
        "SELECT * FROM group_targets WHERE group_id = ANY($1) ORDER BY email",
    )
    .bind(group_ids)
    .fetch_all(&state.db)
    .await?;

    let mut by_group: HashMap<Uuid, Vec<TargetRow>> = HashMap::new();
    for row in rows {
        by_group.entry(row.group_id).or_default().push(row);
    }
    Ok(by_group)
}

/// Replace a group's targets with the requested roster. Runs on the
/// caller's transaction so the roster commits together with the group row.
async fn replace_targets(
    conn: &mut PgConnection,
    group_id: Uuid,
    targets: &[TargetRequest],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM group_targets WHERE group_id = $1")
        .bind(group_id)
        .execute(&mut *conn)
        .await?;

    for target in targets {
        sqlx::query(
            r"
            INSERT INTO group_targets (group_id, email, first_name, last_name, position)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(group_id)
        .bind(target.email.trim())
        .bind(&target.first_name)
        .bind(&target.last_name)
        .bind(&target.position)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// List groups visible to the caller.
///
/// GET /api/groups
#[utoipa::path(
    get,
    path = "/api/groups",
    tag = "groups",
    responses(
        (status = 200, body = Vec<GroupResponse>),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn list_groups(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<GroupResponse>>, GroupError> {
    let rows: Vec<GroupRow> = sqlx::query_as("SELECT * FROM groups ORDER BY name")
        .fetch_all(&state.db)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut grants = fetch_grants_for_resources(&state.db, KIND, &ids).await?;
    let mut targets = fetch_targets(&state, &ids).await?;

    let mut visible = Vec::new();
    for row in rows {
        let access = compute_access(
            row.user_id,
            grants.remove(&row.id).unwrap_or_default(),
            auth_user.id,
        )?;
        if access.can_view() {
            let roster = targets.remove(&row.id).unwrap_or_default();
            visible.push(GroupResponse::from_parts(row, roster, access));
        }
    }

    Ok(Json(visible))
}

/// Create a group.
///
/// POST /api/groups
#[utoipa::path(
    post,
    path = "/api/groups",
    tag = "groups",
    request_body = GroupRequest,
    responses(
        (status = 201, body = GroupResponse),
        (status = 400, description = "Invalid name, targets, or unknown team"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request), fields(name = %request.name))]
pub async fn create_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<GroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), GroupError> {
    validate_request(&request)?;

    if !all_teams_exist(&state.db, &request.teams).await? {
        return Err(GroupError::UnknownTeam);
    }

    // The group, its roster, and its shares land or fail together; a
    // target insert error must not leave an empty group behind.
    let mut tx = state.db.begin().await?;

    let row: GroupRow =
        sqlx::query_as("INSERT INTO groups (user_id, name) VALUES ($1, $2) RETURNING *")
            .bind(auth_user.id)
            .bind(request.name.trim())
            .fetch_one(&mut *tx)
            .await?;

    replace_targets(&mut *tx, row.id, &request.targets).await?;
    if !request.teams.is_empty() {
        replace_resource_teams(&mut *tx, KIND, row.id, &request.teams).await?;
    }

    tx.commit().await?;

    let access = load_resource_access(&state.db, KIND, row.id, row.user_id, auth_user.id).await?;
    let roster = fetch_targets(&state, &[row.id])
        .await?
        .remove(&row.id)
        .unwrap_or_default();

    tracing::info!(group_id = %row.id, targets = roster.len(), "group created");

    Ok((
        StatusCode::CREATED,
        Json(GroupResponse::from_parts(row, roster, access)),
    ))
}

/// Get a single group.
///
/// GET /api/groups/{id}
#[utoipa::path(
    get,
    path = "/api/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, body = GroupResponse),
        (status = 404, description = "Group not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn get_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupResponse>, GroupError> {
    let (row, access) = load_group(&state, group_id, auth_user.id).await?;
    let roster = fetch_targets(&state, &[group_id])
        .await?
        .remove(&group_id)
        .unwrap_or_default();
    Ok(Json(GroupResponse::from_parts(row, roster, access)))
}

/// Update a group's name and target roster.
///
/// PUT /api/groups/{id}
#[utoipa::path(
    put,
    path = "/api/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = GroupRequest,
    responses(
        (status = 200, body = GroupResponse),
        (status = 403, description = "No edit permission"),
        (status = 404, description = "Group not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(request): Json<GroupRequest>,
) -> Result<Json<GroupResponse>, GroupError> {
    validate_request(&request)?;

    let (_, access) = load_group(&state, group_id, auth_user.id).await?;
    access.require_edit()?;

    let mut tx = state.db.begin().await?;

    let row: GroupRow = sqlx::query_as(
        "UPDATE groups SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(group_id)
    .bind(request.name.trim())
    .fetch_one(&mut *tx)
    .await?;

    replace_targets(&mut *tx, group_id, &request.targets).await?;

    tx.commit().await?;

    let roster = fetch_targets(&state, &[group_id])
        .await?
        .remove(&group_id)
        .unwrap_or_default();

    Ok(Json(GroupResponse::from_parts(row, roster, access)))
}

/// Delete a group.
///
/// DELETE /api/groups/{id}
#[utoipa::path(
    delete,
    path = "/api/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 403, description = "No delete permission"),
        (status = 404, description = "Group not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<StatusCode, GroupError> {
    let (_, access) = load_group(&state, group_id, auth_user.id).await?;
    access.require_delete()?;

    // Share rows have no FK to groups; delete both in one transaction so
    // a failure cannot strand orphaned shares.
    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM groups WHERE id = $1")
        .bind(group_id)
        .execute(&mut *tx)
        .await?;
    delete_resource_shares(&mut *tx, KIND, group_id).await?;
    tx.commit().await?;

    tracing::info!(%group_id, "group deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Replace the set of teams a group is shared with.
///
/// PUT /api/groups/{id}/teams
#[utoipa::path(
    put,
    path = "/api/groups/{id}/teams",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = ShareRequest,
    responses(
        (status = 200, body = GroupResponse),
        (status = 400, description = "Unknown team"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Group not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_group_teams(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<GroupResponse>, GroupError> {
    let (row, access) = load_group(&state, group_id, auth_user.id).await?;
    access.require_owner()?;

    if !all_teams_exist(&state.db, &request.teams).await? {
        return Err(GroupError::UnknownTeam);
    }

    let mut tx = state.db.begin().await?;
    replace_resource_teams(&mut *tx, KIND, group_id, &request.teams).await?;
    tx.commit().await?;

    let access = load_resource_access(&state.db, KIND, group_id, row.user_id, auth_user.id).await?;
    let roster = fetch_targets(&state, &[group_id])
        .await?
        .remove(&group_id)
        .unwrap_or_default();

    tracing::info!(%group_id, teams = request.teams.len(), "group shares updated");

    Ok(Json(GroupResponse::from_parts(row, roster, access)))
}

//! Scenario HTTP Handlers
//!
//! Scenarios describe a phishing pretext (landing page URL plus notes) and
//! are shared with teams the same way campaigns are.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::permissions::{compute_access, fetch_grants_for_resources, load_resource_access};
use crate::sharing::queries::{all_teams_exist, delete_resource_shares, replace_resource_teams};
use crate::sharing::{ResourceKind, ShareRequest};

use super::error::ScenarioError;
use super::types::{ScenarioRequest, ScenarioResponse, ScenarioRow};

const KIND: ResourceKind = ResourceKind::Scenarios;

async fn load_scenario(
    state: &AppState,
    scenario_id: Uuid,
    user_id: Uuid,
) -> Result<(ScenarioRow, crate::permissions::ResourceAccess), ScenarioError> {
    let row: ScenarioRow = sqlx::query_as("SELECT * FROM scenarios WHERE id = $1")
        .bind(scenario_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ScenarioError::NotFound)?;

    let access = load_resource_access(&state.db, KIND, scenario_id, row.user_id, user_id).await?;
    access.require_view()?;
    Ok((row, access))
}

/// List scenarios visible to the caller.
///
/// GET /api/scenarios
#[utoipa::path(
    get,
    path = "/api/scenarios",
    tag = "scenarios",
    responses(
        (status = 200, body = Vec<ScenarioResponse>),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn list_scenarios(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ScenarioResponse>>, ScenarioError> {
    let rows: Vec<ScenarioRow> = sqlx::query_as("SELECT * FROM scenarios ORDER BY name")
        .fetch_all(&state.db)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut grants = fetch_grants_for_resources(&state.db, KIND, &ids).await?;

    let mut visible = Vec::new();
    for row in rows {
        let access = compute_access(
            row.user_id,
            grants.remove(&row.id).unwrap_or_default(),
            auth_user.id,
        )?;
        if access.can_view() {
            visible.push(ScenarioResponse::from_parts(row, access));
        }
    }

    Ok(Json(visible))
}

/// Create a scenario.
///
/// POST /api/scenarios
#[utoipa::path(
    post,
    path = "/api/scenarios",
    tag = "scenarios",
    request_body = ScenarioRequest,
    responses(
        (status = 201, body = ScenarioResponse),
        (status = 400, description = "Invalid name or unknown team"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request), fields(name = %request.name))]
pub async fn create_scenario(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<ScenarioRequest>,
) -> Result<(StatusCode, Json<ScenarioResponse>), ScenarioError> {
    if request.name.trim().is_empty() {
        return Err(ScenarioError::NameRequired);
    }
    request.validate().map_err(|_| ScenarioError::NameRequired)?;

    if !all_teams_exist(&state.db, &request.teams).await? {
        return Err(ScenarioError::UnknownTeam);
    }

    // The scenario row and its shares land or fail together.
    let mut tx = state.db.begin().await?;

    let row: ScenarioRow = sqlx::query_as(
        r"
        INSERT INTO scenarios (user_id, name, description, url)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(auth_user.id)
    .bind(request.name.trim())
    .bind(&request.description)
    .bind(&request.url)
    .fetch_one(&mut *tx)
    .await?;

    if !request.teams.is_empty() {
        replace_resource_teams(&mut *tx, KIND, row.id, &request.teams).await?;
    }

    tx.commit().await?;

    let access = load_resource_access(&state.db, KIND, row.id, row.user_id, auth_user.id).await?;

    tracing::info!(scenario_id = %row.id, "scenario created");

    Ok((
        StatusCode::CREATED,
        Json(ScenarioResponse::from_parts(row, access)),
    ))
}

/// Get a single scenario.
///
/// GET /api/scenarios/{id}
#[utoipa::path(
    get,
    path = "/api/scenarios/{id}",
    tag = "scenarios",
    params(("id" = Uuid, Path, description = "Scenario ID")),
    responses(
        (status = 200, body = ScenarioResponse),
        (status = 404, description = "Scenario not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn get_scenario(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(scenario_id): Path<Uuid>,
) -> Result<Json<ScenarioResponse>, ScenarioError> {
    let (row, access) = load_scenario(&state, scenario_id, auth_user.id).await?;
    Ok(Json(ScenarioResponse::from_parts(row, access)))
}

/// Update a scenario.
///
/// PUT /api/scenarios/{id}
#[utoipa::path(
    put,
    path = "/api/scenarios/{id}",
    tag = "scenarios",
    params(("id" = Uuid, Path, description = "Scenario ID")),
    request_body = ScenarioRequest,
    responses(
        (status = 200, body = ScenarioResponse),
        (status = 403, description = "No edit permission"),
        (status = 404, description = "Scenario not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_scenario(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<ScenarioRequest>,
) -> Result<Json<ScenarioResponse>, ScenarioError> {
    if request.name.trim().is_empty() {
        return Err(ScenarioError::NameRequired);
    }
    request.validate().map_err(|_| ScenarioError::NameRequired)?;

    let (_, access) = load_scenario(&state, scenario_id, auth_user.id).await?;
    access.require_edit()?;

    let row: ScenarioRow = sqlx::query_as(
        r"
        UPDATE scenarios
        SET name = $2, description = $3, url = $4, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(scenario_id)
    .bind(request.name.trim())
    .bind(&request.description)
    .bind(&request.url)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(ScenarioResponse::from_parts(row, access)))
}

/// Delete a scenario.
///
/// DELETE /api/scenarios/{id}
#[utoipa::path(
    delete,
    path = "/api/scenarios/{id}",
    tag = "scenarios",
    params(("id" = Uuid, Path, description = "Scenario ID")),
    responses(
        (status = 204, description = "Scenario deleted"),
        (status = 403, description = "No delete permission"),
        (status = 404, description = "Scenario not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn delete_scenario(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(scenario_id): Path<Uuid>,
) -> Result<StatusCode, ScenarioError> {
    let (_, access) = load_scenario(&state, scenario_id, auth_user.id).await?;
    access.require_delete()?;

    // Share rows have no FK to scenarios; delete both in one transaction
    // so a failure cannot strand orphaned shares.
    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM scenarios WHERE id = $1")
        .bind(scenario_id)
        .execute(&mut *tx)
        .await?;
    delete_resource_shares(&mut *tx, KIND, scenario_id).await?;
    tx.commit().await?;

    tracing::info!(%scenario_id, "scenario deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Replace the set of teams a scenario is shared with.
///
/// PUT /api/scenarios/{id}/teams
#[utoipa::path(
    put,
    path = "/api/scenarios/{id}/teams",
    tag = "scenarios",
    params(("id" = Uuid, Path, description = "Scenario ID")),
    request_body = ShareRequest,
    responses(
        (status = 200, body = ScenarioResponse),
        (status = 400, description = "Unknown team"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Scenario not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_scenario_teams(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<ScenarioResponse>, ScenarioError> {
    let (row, access) = load_scenario(&state, scenario_id, auth_user.id).await?;
    access.require_owner()?;

    if !all_teams_exist(&state.db, &request.teams).await? {
        return Err(ScenarioError::UnknownTeam);
    }

    let mut tx = state.db.begin().await?;
    replace_resource_teams(&mut *tx, KIND, scenario_id, &request.teams).await?;
    tx.commit().await?;

    let access =
        load_resource_access(&state.db, KIND, scenario_id, row.user_id, auth_user.id).await?;

    tracing::info!(%scenario_id, teams = request.teams.len(), "scenario shares updated");

    Ok(Json(ScenarioResponse::from_parts(row, access)))
}

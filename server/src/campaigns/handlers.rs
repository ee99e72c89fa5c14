//! Campaign HTTP Handlers
//!
//! Campaigns are owned by their creator and optionally shared with teams.
//! Visibility, edit, and delete rights come from the permission resolver;
//! the share list itself is owner-managed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::permissions::{compute_access, fetch_grants_for_resources, load_resource_access};
use crate::sharing::queries::{all_teams_exist, delete_resource_shares, replace_resource_teams};
use crate::sharing::{ResourceKind, ShareRequest};

use super::error::CampaignError;
use super::types::{
    CampaignRequest, CampaignResponse, CampaignRow, STATUS_IN_PROGRESS, STATUS_SCHEDULED,
};

const KIND: ResourceKind = ResourceKind::Campaigns;

/// Load a campaign row together with the caller's access to it.
async fn load_campaign(
    state: &AppState,
    campaign_id: Uuid,
    user_id: Uuid,
) -> Result<(CampaignRow, crate::permissions::ResourceAccess), CampaignError> {
    let row: CampaignRow = sqlx::query_as("SELECT * FROM campaigns WHERE id = $1")
        .bind(campaign_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(CampaignError::NotFound)?;

    let access = load_resource_access(&state.db, KIND, campaign_id, row.user_id, user_id).await?;
    access.require_view()?;
    Ok((row, access))
}

/// List campaigns visible to the caller.
///
/// GET /api/campaigns
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "campaigns",
    responses(
        (status = 200, body = Vec<CampaignResponse>),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn list_campaigns(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<CampaignResponse>>, CampaignError> {
    let rows: Vec<CampaignRow> = sqlx::query_as("SELECT * FROM campaigns ORDER BY launch_date DESC")
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
            visible.push(CampaignResponse::from_parts(row, access));
        }
    }

    Ok(Json(visible))
}

/// Create a campaign.
///
/// A launch date in the past (or omitted) starts the campaign immediately.
///
/// POST /api/campaigns
#[utoipa::path(
    post,
    path = "/api/campaigns",
    tag = "campaigns",
    request_body = CampaignRequest,
    responses(
        (status = 201, body = CampaignResponse),
        (status = 400, description = "Invalid name or unknown team"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request), fields(name = %request.name))]
pub async fn create_campaign(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CampaignRequest>,
) -> Result<(StatusCode, Json<CampaignResponse>), CampaignError> {
    if request.name.trim().is_empty() {
        return Err(CampaignError::NameRequired);
    }
    request.validate().map_err(|_| CampaignError::NameRequired)?;

    if !all_teams_exist(&state.db, &request.teams).await? {
        return Err(CampaignError::UnknownTeam);
    }

    let launch_date = request.launch_date.unwrap_or_else(Utc::now);
    let status = if launch_date <= Utc::now() {
        STATUS_IN_PROGRESS
    } else {
        STATUS_SCHEDULED
    };

    // The campaign row and its shares land or fail together.
    let mut tx = state.db.begin().await?;

    let row: CampaignRow = sqlx::query_as(
        r"
        INSERT INTO campaigns (user_id, name, status, url, launch_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        ",
    )
    .bind(auth_user.id)
    .bind(request.name.trim())
    .bind(status)
    .bind(&request.url)
    .bind(launch_date)
    .fetch_one(&mut *tx)
    .await?;

    if !request.teams.is_empty() {
        replace_resource_teams(&mut *tx, KIND, row.id, &request.teams).await?;
    }

    tx.commit().await?;

    let access = load_resource_access(&state.db, KIND, row.id, row.user_id, auth_user.id).await?;

    tracing::info!(campaign_id = %row.id, status, "campaign created");

    Ok((
        StatusCode::CREATED,
        Json(CampaignResponse::from_parts(row, access)),
    ))
}

/// Get a single campaign.
///
/// GET /api/campaigns/{id}
#[utoipa::path(
    get,
    path = "/api/campaigns/{id}",
    tag = "campaigns",
    params(("id" = Uuid, Path, description = "Campaign ID")),
    responses(
        (status = 200, body = CampaignResponse),
        (status = 404, description = "Campaign not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn get_campaign(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<CampaignResponse>, CampaignError> {
    let (row, access) = load_campaign(&state, campaign_id, auth_user.id).await?;
    Ok(Json(CampaignResponse::from_parts(row, access)))
}

/// Update a campaign's details.
///
/// PUT /api/campaigns/{id}
#[utoipa::path(
    put,
    path = "/api/campaigns/{id}",
    tag = "campaigns",
    params(("id" = Uuid, Path, description = "Campaign ID")),
    request_body = CampaignRequest,
    responses(
        (status = 200, body = CampaignResponse),
        (status = 403, description = "No edit permission"),
        (status = 404, description = "Campaign not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_campaign(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<CampaignRequest>,
) -> Result<Json<CampaignResponse>, CampaignError> {
    if request.name.trim().is_empty() {
        return Err(CampaignError::NameRequired);
    }
    request.validate().map_err(|_| CampaignError::NameRequired)?;

    let (row, access) = load_campaign(&state, campaign_id, auth_user.id).await?;
    access.require_edit()?;

    let launch_date = request.launch_date.unwrap_or(row.launch_date);

    let row: CampaignRow = sqlx::query_as(
        r"
        UPDATE campaigns
        SET name = $2, url = $3, launch_date = $4, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(campaign_id)
    .bind(request.name.trim())
    .bind(&request.url)
    .bind(launch_date)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(CampaignResponse::from_parts(row, access)))
}

/// Mark a campaign as completed.
///
/// POST /api/campaigns/{id}/complete
#[utoipa::path(
    post,
    path = "/api/campaigns/{id}/complete",
    tag = "campaigns",
    params(("id" = Uuid, Path, description = "Campaign ID")),
    responses(
        (status = 200, body = CampaignResponse),
        (status = 403, description = "No edit permission"),
        (status = 404, description = "Campaign not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn complete_campaign(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<CampaignResponse>, CampaignError> {
    let (_, access) = load_campaign(&state, campaign_id, auth_user.id).await?;
    access.require_edit()?;

    let row: CampaignRow = sqlx::query_as(
        r"
        UPDATE campaigns
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(campaign_id)
    .bind(super::types::STATUS_COMPLETED)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(%campaign_id, "campaign completed");

    Ok(Json(CampaignResponse::from_parts(row, access)))
}

/// Delete a campaign.
///
/// DELETE /api/campaigns/{id}
#[utoipa::path(
    delete,
    path = "/api/campaigns/{id}",
    tag = "campaigns",
    params(("id" = Uuid, Path, description = "Campaign ID")),
    responses(
        (status = 204, description = "Campaign deleted"),
        (status = 403, description = "No delete permission"),
        (status = 404, description = "Campaign not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state))]
pub async fn delete_campaign(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<StatusCode, CampaignError> {
    let (_, access) = load_campaign(&state, campaign_id, auth_user.id).await?;
    access.require_delete()?;

    // Share rows have no FK to campaigns; delete both in one transaction
    // so a failure cannot strand orphaned shares.
    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM campaigns WHERE id = $1")
        .bind(campaign_id)
        .execute(&mut *tx)
        .await?;
    delete_resource_shares(&mut *tx, KIND, campaign_id).await?;
    tx.commit().await?;

    tracing::info!(%campaign_id, "campaign deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Replace the set of teams a campaign is shared with.
///
/// Owner only; team roles never grant share management.
///
/// PUT /api/campaigns/{id}/teams
#[utoipa::path(
    put,
    path = "/api/campaigns/{id}/teams",
    tag = "campaigns",
    params(("id" = Uuid, Path, description = "Campaign ID")),
    request_body = ShareRequest,
    responses(
        (status = 200, body = CampaignResponse),
        (status = 400, description = "Unknown team"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Campaign not found or not visible"),
    ),
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_campaign_teams(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<CampaignResponse>, CampaignError> {
    let (row, access) = load_campaign(&state, campaign_id, auth_user.id).await?;
    access.require_owner()?;

    if !all_teams_exist(&state.db, &request.teams).await? {
        return Err(CampaignError::UnknownTeam);
    }

    let mut tx = state.db.begin().await?;
    replace_resource_teams(&mut *tx, KIND, campaign_id, &request.teams).await?;
    tx.commit().await?;

    let access = load_resource_access(&state.db, KIND, campaign_id, row.user_id, auth_user.id).await?;

    tracing::info!(%campaign_id, teams = request.teams.len(), "campaign shares updated");

    Ok(Json(CampaignResponse::from_parts(row, access)))
}

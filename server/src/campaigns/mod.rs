//! Phishing Campaigns
//!
//! Campaign lifecycle and team sharing. Routes live under
//! `/api/campaigns`.

pub mod error;
pub mod handlers;
pub mod types;

pub use error::CampaignError;
pub use types::{CampaignRequest, CampaignResponse};

use axum::routing::{get, post, put};
use axum::Router;

use crate::api::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_campaigns).post(handlers::create_campaign),
        )
        .route(
            "/{id}",
            get(handlers::get_campaign)
                .put(handlers::update_campaign)
                .delete(handlers::delete_campaign),
        )
        .route("/{id}/complete", post(handlers::complete_campaign))
        .route("/{id}/teams", put(handlers::update_campaign_teams))
}

//! Phishing Scenarios
//!
//! Reusable pretexts a campaign can be built from. Routes live under
//! `/api/scenarios`.

pub mod error;
pub mod handlers;
pub mod types;

pub use error::ScenarioError;
pub use types::{ScenarioRequest, ScenarioResponse};

use axum::routing::{get, put};
use axum::Router;

use crate::api::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_scenarios).post(handlers::create_scenario),
        )
        .route(
            "/{id}",
            get(handlers::get_scenario)
                .put(handlers::update_scenario)
                .delete(handlers::delete_scenario),
        )
        .route("/{id}/teams", put(handlers::update_scenario_teams))
}

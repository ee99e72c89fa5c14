//! Team Management
//!
//! Teams group users under a role that drives shared-resource
//! permissions. Roster routes live under `/api/teams`.

pub mod error;
pub mod handlers;
pub mod types;

pub use error::TeamError;
pub use types::{TeamMemberResponse, TeamRequest, TeamResponse};

use axum::routing::get;
use axum::Router;

use crate::api::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_teams).post(handlers::create_team))
        .route(
            "/{id}",
            get(handlers::get_team)
                .put(handlers::update_team)
                .delete(handlers::delete_team),
        )
}

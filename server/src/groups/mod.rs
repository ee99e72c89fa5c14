//! Target Groups
//!
//! Groups hold the people a campaign is sent to. Routes live under
//! `/api/groups`.

pub mod error;
pub mod handlers;
pub mod types;

pub use error::GroupError;
pub use types::{GroupRequest, GroupResponse, TargetRequest, TargetResponse};

use axum::routing::{get, put};
use axum::Router;

use crate::api::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_groups).post(handlers::create_group))
        .route(
            "/{id}",
            get(handlers::get_group)
                .put(handlers::update_group)
                .delete(handlers::delete_group),
        )
        .route("/{id}/teams", put(handlers::update_group_teams))
}

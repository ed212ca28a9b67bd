use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    errors::ApiError,
    state::AppState,
    timeline::{dto::Timeline, services::assemble},
};

pub fn timeline_routes() -> Router<AppState> {
    Router::new()
        .route("/timeline", get(own_timeline))
        .route("/timeline/:user_id", get(user_timeline))
}

async fn timeline_for(state: &AppState, user_id: i64) -> Result<Json<Timeline>, ApiError> {
    let timeline = assemble(
        state.users.as_ref(),
        state.graph.as_ref(),
        state.tweets.as_ref(),
        user_id,
        state.config.timeline_include_own,
    )
    .await?;
    Ok(Json(timeline))
}

#[instrument(skip(state))]
pub async fn user_timeline(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Timeline>, ApiError> {
    timeline_for(&state, user_id).await
}

#[instrument(skip(state))]
pub async fn own_timeline(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Timeline>, ApiError> {
    timeline_for(&state, user_id).await
}

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    errors::ApiError,
    follows::dto::{FollowRequest, UnfollowRequest},
    state::AppState,
};

pub fn follow_routes() -> Router<AppState> {
    Router::new()
        .route("/follow", post(follow))
        .route("/unfollow", post(unfollow))
}

#[instrument(skip(state, payload))]
pub async fn follow(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<FollowRequest>,
) -> Result<StatusCode, ApiError> {
    if payload.follow == user_id {
        warn!(user_id, "attempt to follow self");
        return Err(ApiError::BadRequest("Cannot follow yourself".into()));
    }

    state.graph.follow(user_id, payload.follow).await?;
    info!(user_id, followee_id = payload.follow, "followed");
    Ok(StatusCode::OK)
}

#[instrument(skip(state, payload))]
pub async fn unfollow(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UnfollowRequest>,
) -> Result<StatusCode, ApiError> {
    state.graph.unfollow(user_id, payload.unfollow).await?;
    info!(user_id, followee_id = payload.unfollow, "unfollowed");
    Ok(StatusCode::OK)
}

use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, SignUpRequest, TokenResponse},
        jwt::JwtKeys,
        services::{self, is_valid_email, normalize_email},
    },
    errors::ApiError,
    state::AppState,
};

/// Counted in characters, like tweet length.
const MIN_PASSWORD_LEN: usize = 8;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::BadRequest("Password too short".into()));
    }

    let user = services::register(
        state.users.as_ref(),
        &payload.name,
        &email,
        &payload.password,
        &payload.profile,
    )
    .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    let user_id = services::authenticate(state.users.as_ref(), &email, &payload.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.issue(user_id)?;

    info!(user_id, "user logged in");
    Ok(Json(TokenResponse { access_token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_serialization() {
        let json = serde_json::to_value(TokenResponse {
            access_token: "abc".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "access_token": "abc" }));
    }

    #[test]
    fn public_user_hides_password_hash() {
        let json = serde_json::to_string(&PublicUser {
            id: 1,
            name: "test_kim".into(),
            email: "test@gmail.com".into(),
            profile: "test profile".into(),
        })
        .unwrap();
        assert!(json.contains("test@gmail.com"));
        assert!(!json.contains("password"));
    }
}

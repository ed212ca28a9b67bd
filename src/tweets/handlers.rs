use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    errors::ApiError,
    state::AppState,
    tweets::dto::{TweetRequest, TweetResponse},
};

pub const MAX_TWEET_CHARS: usize = 300;

pub fn tweet_routes() -> Router<AppState> {
    Router::new().route("/tweet", post(post_tweet))
}

/// Tweets are 1..=300 characters, counted as chars rather than bytes.
pub(crate) fn validate_tweet(text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest("Tweet must not be empty".into()));
    }
    if text.chars().count() > MAX_TWEET_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Tweet exceeds {MAX_TWEET_CHARS} characters"
        )));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn post_tweet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<TweetRequest>,
) -> Result<Json<TweetResponse>, ApiError> {
    if let Err(e) = validate_tweet(&payload.tweet) {
        warn!(user_id, error = %e, "tweet rejected");
        return Err(e);
    }

    let tweet = state.tweets.post(user_id, &payload.tweet).await?;
    info!(user_id, tweet_id = tweet.id, "tweet posted");
    Ok(Json(tweet.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tweets_up_to_the_limit() {
        assert!(validate_tweet("hello world!").is_ok());
        assert!(validate_tweet(&"a".repeat(MAX_TWEET_CHARS)).is_ok());
        // multi-byte characters count once each
        assert!(validate_tweet(&"안".repeat(MAX_TWEET_CHARS)).is_ok());
    }

    #[test]
    fn rejects_empty_and_oversized_tweets() {
        assert!(matches!(validate_tweet(""), Err(ApiError::BadRequest(_))));
        assert!(matches!(validate_tweet("   "), Err(ApiError::BadRequest(_))));
        assert!(matches!(
            validate_tweet(&"a".repeat(MAX_TWEET_CHARS + 1)),
            Err(ApiError::BadRequest(_))
        ));
    }
}

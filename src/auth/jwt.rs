use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{auth::services::AuthError, config::JwtConfig, errors::ApiError, state::AppState};

/// JWT payload bound to a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user ID
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub jti: Uuid,
}

/// Signing and verification keys plus the claims they enforce.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64).saturating_mul(60)),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from(&state.config.jwt)
    }
}

impl JwtKeys {
    /// Issue an access token for `user_id`.
    pub fn issue(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map(TimeDuration::seconds)
            .map_err(|_| anyhow::anyhow!("token lifetime out of range"))?;
        let exp = now
            .checked_add(ttl)
            .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    /// Check signature, expiry, issuer and audience; return the bound user id.
    pub fn validate(&self, token: &str) -> Result<i64, AuthError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            AuthError::Unauthorized
        })?;
        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::Unauthorized)?;
        debug!(user_id, "jwt verified");
        Ok(user_id)
    }
}

/// Pull the token out of an `Authorization` header value. Both
/// `Bearer <token>` and a bare token are accepted.
pub fn token_from_header(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Authenticated caller, resolved from the `Authorization` header.
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(token_from_header)
            .ok_or(ApiError::Unauthorized("missing Authorization header"))?;

        match keys.validate(token) {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(_) => {
                warn!("invalid or expired token");
                Err(ApiError::Unauthorized("invalid or expired token"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
        })
    }

    #[test]
    fn issue_and_validate() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let token = keys.issue(1).expect("issue");
        assert_eq!(keys.validate(&token).expect("validate"), 1);
    }

    #[test]
    fn oversized_ttl_is_an_error_not_a_panic() {
        let keys = JwtKeys::from(&JwtConfig {
            secret: "dev-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: 1_000_000_000_000_000,
        });
        let err = keys.issue(1).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        let keys = JwtKeys {
            ttl: Duration::from_secs(u64::MAX),
            ..make_keys("dev-secret", "iss", "aud")
        };
        assert!(keys.issue(1).is_err());
    }

    #[test]
    fn tokens_for_the_same_user_are_distinct() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert_ne!(keys.issue(7).unwrap(), keys.issue(7).unwrap());
    }

    #[test]
    fn rejects_wrong_issuer_or_audience() {
        let good = make_keys("same-secret", "good-iss", "good-aud");
        let bad = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good.issue(1).expect("issue");
        assert!(matches!(bad.validate(&token), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn rejects_token_signed_with_another_secret() {
        let ours = make_keys("ours", "iss", "aud");
        let theirs = make_keys("theirs", "iss", "aud");
        let token = theirs.issue(1).expect("issue");
        assert!(matches!(ours.validate(&token), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn rejects_expired_token() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let past = OffsetDateTime::now_utc() - TimeDuration::hours(2);
        let claims = Claims {
            sub: "1".into(),
            iat: past.unix_timestamp() as usize,
            exp: (past + TimeDuration::minutes(5)).unix_timestamp() as usize,
            iss: "iss".into(),
            aud: "aud".into(),
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(matches!(keys.validate(&token), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn rejects_garbage() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert!(keys.validate("not.a.jwt").is_err());
        assert!(keys.validate("").is_err());
    }

    #[test]
    fn header_parsing_accepts_bearer_and_raw_tokens() {
        assert_eq!(token_from_header("Bearer abc.def"), Some("abc.def"));
        assert_eq!(token_from_header("bearer abc.def"), Some("abc.def"));
        assert_eq!(token_from_header("abc.def"), Some("abc.def"));
        assert_eq!(token_from_header("Bearer "), None);
        assert_eq!(token_from_header("   "), None);
    }
}

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::auth::{
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::db::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user not found")]
    NotFound,
    #[error("wrong password")]
    BadPassword,
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("password hashing failed: {0}")]
    Hash(anyhow::Error),
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Resolve a user id from an email/password pair.
pub async fn authenticate(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<i64, AuthError> {
    let email = normalize_email(email);
    let user = users.find_by_email(&email).await?.ok_or_else(|| {
        warn!(email = %email, "login unknown email");
        AuthError::NotFound
    })?;

    if !verify_password(password, &user.hashed_password).map_err(AuthError::Hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AuthError::BadPassword);
    }

    debug!(user_id = user.id, "credentials verified");
    Ok(user.id)
}

/// Hash the password and insert the user.
pub async fn register(
    users: &dyn UserStore,
    name: &str,
    email: &str,
    password: &str,
    profile: &str,
) -> Result<User, AuthError> {
    let hashed_password = hash_password(password).map_err(AuthError::Hash)?;
    let user = users
        .create_user(NewUser {
            name: name.trim().to_string(),
            email: normalize_email(email),
            profile: profile.to_string(),
            hashed_password,
        })
        .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    async fn store_with_user() -> MemoryStore {
        let store = MemoryStore::default();
        register(&store, "test_kim", "test@gmail.com", "test_password", "test profile")
            .await
            .expect("register");
        store
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("test@gmail.com"));
        assert!(!is_valid_email("test@gmail"));
        assert!(!is_valid_email("no at sign.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn authenticate_returns_user_id() {
        let store = store_with_user().await;
        let id = authenticate(&store, "test@gmail.com", "test_password")
            .await
            .expect("authenticate");
        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn authenticate_normalizes_email() {
        let store = store_with_user().await;
        let id = authenticate(&store, "  TEST@gmail.com ", "test_password")
            .await
            .expect("authenticate");
        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn authenticate_unknown_email() {
        let store = store_with_user().await;
        let err = authenticate(&store, "nobody@gmail.com", "test_password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn authenticate_wrong_password() {
        let store = store_with_user().await;
        let err = authenticate(&store, "test@gmail.com", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::BadPassword));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let store = store_with_user().await;
        let err = register(&store, "again", "test@gmail.com", "another_pw", "")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Store(StoreError::DuplicateEmail)));
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                      // unique user ID
    pub name: String,                 // display name
    pub email: String,                // login email, unique
    pub profile: String,              // free-text profile
    #[serde(skip_serializing)]
    pub hashed_password: String,      // Argon2 hash, not exposed in JSON
    pub created_at: OffsetDateTime,
}

/// Fields needed to insert a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub profile: String,
    pub hashed_password: String,
}

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::{is_foreign_key_violation, PgStore, StoreError, StoreResult};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tweet {
    pub id: i64,
    pub user_id: i64,
    pub tweet: String,
    pub created_at: OffsetDateTime,
}

/// Tweet store: append-only posts, read back in insertion order.
#[async_trait]
pub trait TweetStore: Send + Sync {
    async fn post(&self, user_id: i64, text: &str) -> StoreResult<Tweet>;
    async fn tweets_by(&self, user_id: i64) -> StoreResult<Vec<Tweet>>;

    /// Tweets by any of `authors`, ordered by `(created_at, id)`, read in one go.
    async fn tweets_by_authors(&self, authors: &BTreeSet<i64>) -> StoreResult<Vec<Tweet>> {
        let mut merged = Vec::new();
        for author in authors {
            merged.extend(self.tweets_by(*author).await?);
        }
        merged.sort_by_key(|t: &Tweet| (t.created_at, t.id));
        Ok(merged)
    }
}

#[async_trait]
impl TweetStore for PgStore {
    async fn post(&self, user_id: i64, text: &str) -> StoreResult<Tweet> {
        sqlx::query_as::<_, Tweet>(
            r#"
            INSERT INTO tweets (user_id, tweet)
            VALUES ($1, $2)
            RETURNING id, user_id, tweet, created_at
            "#,
        )
        .bind(user_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreError::NotFound("user")
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn tweets_by(&self, user_id: i64) -> StoreResult<Vec<Tweet>> {
        let rows = sqlx::query_as::<_, Tweet>(
            r#"
            SELECT id, user_id, tweet, created_at
            FROM tweets
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn tweets_by_authors(&self, authors: &BTreeSet<i64>) -> StoreResult<Vec<Tweet>> {
        if authors.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = authors.iter().copied().collect();
        let rows = sqlx::query_as::<_, Tweet>(
            r#"
            SELECT id, user_id, tweet, created_at
            FROM tweets
            WHERE user_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

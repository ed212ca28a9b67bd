use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::db::{is_foreign_key_violation, PgStore, StoreError, StoreResult};

/// Directed follow edges between users.
#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Adding an edge that already exists is a no-op.
    async fn follow(&self, follower_id: i64, followee_id: i64) -> StoreResult<()>;
    /// Removing an edge that does not exist is a no-op.
    async fn unfollow(&self, follower_id: i64, followee_id: i64) -> StoreResult<()>;
    async fn followees_of(&self, user_id: i64) -> StoreResult<BTreeSet<i64>>;
}

#[async_trait]
impl SocialGraph for PgStore {
    async fn follow(&self, follower_id: i64, followee_id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)"#,
        )
        .bind(followee_id)
        .fetch_one(&mut *tx)
        .await?;
        if !exists {
            return Err(StoreError::NotFound("user"));
        }

        sqlx::query(
            r#"
            INSERT INTO users_follow_list (user_id, follow_user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, follow_user_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreError::NotFound("user")
            } else {
                StoreError::Database(e)
            }
        })?;

        tx.commit().await?;
        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, followee_id: i64) -> StoreResult<()> {
        sqlx::query(
            r#"
            DELETE FROM users_follow_list
             WHERE user_id = $1 AND follow_user_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn followees_of(&self, user_id: i64) -> StoreResult<BTreeSet<i64>> {
        let rows: Vec<i64> = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT follow_user_id
              FROM users_follow_list
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}

use std::collections::BTreeSet;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    db::{StoreError, StoreResult},
    follows::repo::SocialGraph,
    tweets::repo::{Tweet, TweetStore},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tweets: Vec<Tweet>,
    follows: BTreeSet<(i64, i64)>,
    last_created_at: Option<OffsetDateTime>,
}

impl Tables {
    fn user_exists(&self, id: i64) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    /// Creation timestamps never go backwards, so insertion order and time order agree.
    fn next_timestamp(&mut self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let ts = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }
}

/// In-process store used for local runs and tests. Ids start at 1 and
/// increase in insertion order, like the BIGSERIAL columns.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let created_at = t.next_timestamp();
        let row = User {
            id: t.users.len() as i64 + 1,
            name: user.name,
            email: user.email,
            profile: user.profile,
            hashed_password: user.hashed_password,
            created_at,
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl TweetStore for MemoryStore {
    async fn post(&self, user_id: i64, text: &str) -> StoreResult<Tweet> {
        let mut t = self.tables.write().await;
        if !t.user_exists(user_id) {
            return Err(StoreError::NotFound("user"));
        }
        let created_at = t.next_timestamp();
        let row = Tweet {
            id: t.tweets.len() as i64 + 1,
            user_id,
            tweet: text.to_string(),
            created_at,
        };
        t.tweets.push(row.clone());
        Ok(row)
    }

    async fn tweets_by(&self, user_id: i64) -> StoreResult<Vec<Tweet>> {
        let t = self.tables.read().await;
        Ok(t.tweets
            .iter()
            .filter(|tw| tw.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn tweets_by_authors(&self, authors: &BTreeSet<i64>) -> StoreResult<Vec<Tweet>> {
        let t = self.tables.read().await;
        Ok(t.tweets
            .iter()
            .filter(|tw| authors.contains(&tw.user_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SocialGraph for MemoryStore {
    async fn follow(&self, follower_id: i64, followee_id: i64) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if !t.user_exists(follower_id) || !t.user_exists(followee_id) {
            return Err(StoreError::NotFound("user"));
        }
        t.follows.insert((follower_id, followee_id));
        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, followee_id: i64) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        t.follows.remove(&(follower_id, followee_id));
        Ok(())
    }

    async fn followees_of(&self, user_id: i64) -> StoreResult<BTreeSet<i64>> {
        let t = self.tables.read().await;
        Ok(t.follows
            .range((user_id, i64::MIN)..=(user_id, i64::MAX))
            .map(|(_, followee)| *followee)
            .collect())
    }
}

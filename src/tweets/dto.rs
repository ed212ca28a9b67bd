use serde::{Deserialize, Serialize};

use crate::tweets::repo::Tweet;

#[derive(Debug, Deserialize)]
pub struct TweetRequest {
    pub tweet: String,
}

#[derive(Debug, Serialize)]
pub struct TweetResponse {
    pub id: i64,
    pub user_id: i64,
    pub tweet: String,
}

impl From<Tweet> for TweetResponse {
    fn from(t: Tweet) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            tweet: t.tweet,
        }
    }
}

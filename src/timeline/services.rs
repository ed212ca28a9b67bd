use tracing::debug;

use crate::{
    auth::repo::UserStore,
    db::{StoreError, StoreResult},
    follows::repo::SocialGraph,
    timeline::dto::{Timeline, TimelineEntry},
    tweets::repo::TweetStore,
};

/// Build the timeline for `user_id`: tweets by every followee, plus the user's
/// own when `include_own` is set, merged by creation time (id breaks ties).
pub async fn assemble(
    users: &dyn UserStore,
    graph: &dyn SocialGraph,
    tweets: &dyn TweetStore,
    user_id: i64,
    include_own: bool,
) -> StoreResult<Timeline> {
    if users.find_by_id(user_id).await?.is_none() {
        return Err(StoreError::NotFound("user"));
    }

    let mut authors = graph.followees_of(user_id).await?;
    if include_own {
        authors.insert(user_id);
    }

    let merged = tweets.tweets_by_authors(&authors).await?;

    debug!(user_id, authors = authors.len(), tweets = merged.len(), "timeline assembled");
    Ok(Timeline {
        user_id,
        timeline: merged
            .into_iter()
            .map(|t| TimelineEntry {
                user_id: t.user_id,
                tweet: t.tweet,
            })
            .collect(),
    })
}

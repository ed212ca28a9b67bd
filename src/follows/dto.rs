use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub follow: i64,
}

#[derive(Debug, Deserialize)]
pub struct UnfollowRequest {
    pub unfollow: i64,
}

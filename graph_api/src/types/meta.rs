use serde::{Deserialize, Serialize};

use super::User;

/// Continuation marker for cursor-paginated listings.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct NextCursor {
    pub cursor: Option<String>,
}

/// One edge of a following listing.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FollowEntry {
    pub user: User,
}

/// A page of the `/following` endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FollowingResponse {
    pub users: Vec<FollowEntry>,
    #[serde(default)]
    pub next: NextCursor,
}

/// Response of the `/user/bulk` endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BulkUsersResponse {
    pub users: Vec<User>,
}

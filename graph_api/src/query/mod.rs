mod common;
pub use self::common::{PaginatedQuery, Query, QueryCommon};

mod following;
pub use self::following::FollowingQuery;

mod user;
pub use self::user::UserBulkQuery;

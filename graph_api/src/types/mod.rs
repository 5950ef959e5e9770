mod meta;
pub use self::meta::{BulkUsersResponse, FollowEntry, FollowingResponse, NextCursor};

mod user;
pub use self::user::{Bio, Fid, Profile, User, VerifiedAddresses};

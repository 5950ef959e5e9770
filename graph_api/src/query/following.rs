use url::Url;

use super::{common::QueryCommon, PaginatedQuery, Query};

/// Query for the accounts a user follows.
#[derive(Clone)]
pub struct FollowingQuery {
    pub common: QueryCommon,
    pub fid: u64,
}

impl Query for FollowingQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("fid", &self.fid.to_string());
        self.common.add_to_url(&url)
    }
}

impl PaginatedQuery for FollowingQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
}

impl FollowingQuery {
    pub fn new(fid: u64) -> Self {
        Self {
            common: QueryCommon::default(),
            fid,
        }
    }
}

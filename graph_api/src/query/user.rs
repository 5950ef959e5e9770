use url::Url;

use super::Query;

/// Query for one or more users by fid.
///
/// The bulk endpoint takes a single comma-separated `fids` parameter and is
/// not paginated, so this query does not implement `PaginatedQuery`.
#[derive(Clone, Default)]
pub struct UserBulkQuery {
    pub fids: Vec<u64>,
}

impl Query for UserBulkQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let fids = self
            .fids
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(",");
        url.query_pairs_mut().append_pair("fids", &fids);
        url
    }
}

impl UserBulkQuery {
    pub fn with_fid(mut self, fid: u64) -> Self {
        self.fids.push(fid);
        self
    }
    pub fn with_fids(mut self, fids: &[u64]) -> Self {
        self.fids.extend_from_slice(fids);
        self
    }
}

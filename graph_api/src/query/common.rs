//! Shared query infrastructure: the [`Query`] and [`PaginatedQuery`] traits
//! and cursor pagination fields.

use url::Url;

/// Largest page size the provider accepts on list endpoints.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Trait implemented by all query builders.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// Builder methods for list endpoints that page with a cursor.
pub trait PaginatedQuery: Query {
    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the number of results per page, capped at [`MAX_PAGE_SIZE`].
    fn with_limit(mut self, limit: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = Some(limit.clamp(1, MAX_PAGE_SIZE));
        self
    }

    /// Continues a listing from the cursor returned by the previous page.
    fn with_cursor(mut self, cursor: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().cursor = Some(cursor.to_string());
        self
    }
}

/// Fields shared by paginated queries.
#[derive(Clone, Default)]
pub struct QueryCommon {
    /// Results per page. `None` uses the API default.
    pub limit: Option<u32>,
    /// Opaque continuation cursor from a previous response.
    pub cursor: Option<String>,
}

impl QueryCommon {
    /// Appends the pagination parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(limit) = self.limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        };
        if let Some(cursor) = &self.cursor {
            url.query_pairs_mut().append_pair("cursor", cursor.as_str());
        };
        url
    }
}

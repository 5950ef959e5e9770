//! HTTP client for the social-graph API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{FollowingQuery, PaginatedQuery, Query, UserBulkQuery},
    types::{BulkUsersResponse, Fid, FollowingResponse, User},
    Error,
};

/// Default request timeout for social-graph calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the social-graph API.
///
/// Authenticates every request with an `x-api-key` header. The underlying
/// `reqwest::Client` is built once and reused, so connections are pooled
/// across calls.
pub struct Client {
    /// Base URL for the API. Defaults to `https://api.neynar.com/v2/farcaster`.
    base_api_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new(api_key: String) -> Result<Self, Error> {
        Self::with_config("https://api.neynar.com/v2/farcaster", api_key, REQUEST_TIMEOUT)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: String) -> Result<Self, Error> {
        Self::with_config(base_url, api_key, REQUEST_TIMEOUT)
    }

    /// Creates a new client with a custom base URL and per-request timeout.
    pub fn with_config(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    fn get_url(&self, path: &str, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(query.add_to_url(&url))
    }

    async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let url = self.get_url(path, query)?;
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::RequestFailed
                }
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            if e.is_timeout() {
                Error::Timeout
            } else {
                Error::RequestFailed
            }
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        Ok(parsed)
    }

    /// Fetches one page of the accounts `query.fid` follows.
    pub async fn get_following(&self, query: &FollowingQuery) -> Result<FollowingResponse, Error> {
        self.get::<FollowingResponse, FollowingQuery>("/following", query)
            .await
    }

    /// Fetches every account `fid` follows, following the cursor for at most
    /// `max_pages` pages.
    pub async fn get_all_following(
        &self,
        fid: Fid,
        page_size: u32,
        max_pages: usize,
    ) -> Result<Vec<User>, Error> {
        let mut users = Vec::new();
        let mut cursor: Option<String> = None;
        for page in 0..max_pages.max(1) {
            let mut query = FollowingQuery::new(fid).with_limit(page_size);
            if let Some(c) = cursor.as_deref() {
                query = query.with_cursor(c);
            }
            let resp = self.get_following(&query).await?;
            users.extend(resp.users.into_iter().map(|entry| entry.user));
            match resp.next.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => return Ok(users),
            }
            tracing::debug!("following fid={} page {} done, continuing", fid, page + 1);
        }
        tracing::warn!(
            "following listing for fid={} truncated at {} pages ({} users)",
            fid,
            max_pages,
            users.len()
        );
        Ok(users)
    }

    /// Fetches user records for every fid in the query.
    pub async fn get_users(&self, query: &UserBulkQuery) -> Result<BulkUsersResponse, Error> {
        self.get::<BulkUsersResponse, UserBulkQuery>("/user/bulk", query)
            .await
    }

    /// Fetches a single user by fid.
    pub async fn get_user(&self, fid: Fid) -> Result<User, Error> {
        let query = UserBulkQuery::default().with_fid(fid);
        let resp = self.get_users(&query).await?;
        resp.users
            .into_iter()
            .find(|u| u.fid == fid)
            .ok_or(Error::UserNotFound(fid))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

//! Error types for the social-graph client.

/// Errors that can occur when making social-graph API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error or unexpected response body).
    #[error("Request failed")]
    RequestFailed,
    /// The request did not complete within the client timeout.
    #[error("Request timed out")]
    Timeout,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// A user lookup returned no record for the requested fid.
    #[error("User {0} not found")]
    UserNotFound(u64),
}

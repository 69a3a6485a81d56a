use thiserror::Error;

/// Errors fetching a page from the upstream feed.
///
/// A feed error aborts the current sync run; the next scheduled run is
/// the retry mechanism, so no retry happens at this level.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("feed returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Malformed read-query parameter, surfaced to the HTTP caller as a 400.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("invalid score filter {0:?}: expected a number")]
    InvalidScore(String),

    #[error("invalid days filter {0:?}: expected a non-negative integer")]
    InvalidDays(String),

    #[error("invalid year filter {0:?}: expected a 4-digit year")]
    InvalidYear(String),
}

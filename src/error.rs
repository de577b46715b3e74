use thiserror::Error;

/// Errors raised while turning a submitted field map into an [`IssueForm`].
///
/// [`IssueForm`]: crate::IssueForm
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field was absent or contained only whitespace.
    #[error("missing required form field: {0}")]
    MissingField(&'static str),
}

/// Failures reported by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The tracker answered an authenticated call with a non-success status.
    #[error("tracker returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// A response body that had to be JSON was not.
    #[error("invalid JSON response: {0}")]
    InvalidJson(String),
    /// An authenticated call was attempted without a reporter token.
    #[error("no reporter credentials available for authenticated submission")]
    MissingCredentials,
}

/// Errors surfaced by [`IssueDispatcher::dispatch`](crate::IssueDispatcher::dispatch).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Rejected submission: mismatched proxy flag, unknown submit type, or the
    /// public tracker refused the placeholder issue.
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid form: {0}")]
    InvalidForm(#[from] FormError),
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration values that cannot be used to build a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid relay config: {0}")]
    Invalid(String),
}

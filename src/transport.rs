//! Outbound submission seam.
//!
//! The dispatcher only needs two call shapes: a bot ("proxy") POST whose full
//! response it inspects, and an authenticated POST whose parsed JSON it hands
//! back. [`GithubClient`](crate::GithubClient) is the production
//! implementation; tests substitute a recording mock.

use async_trait::async_trait;
use serde_json::Value;

use crate::encode::EncodedIssue;
use crate::error::TransportError;

/// Status GitHub answers with when an issue was created.
pub const STATUS_CREATED: u16 = 201;

/// Response of a proxy POST. Any HTTP status is reported here; deciding what
/// counts as success is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    /// Parsed JSON body, or `Value::Null` when the body was not JSON.
    pub body: Value,
}

impl ProxyResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_created(&self) -> bool {
        self.status == STATUS_CREATED
    }

    /// Browser URL of the created issue, if the body carries one.
    pub fn html_url(&self) -> Option<&str> {
        self.body.get("html_url").and_then(Value::as_str)
    }
}

/// Performs POSTs against issue-tracker API paths such as
/// `repos/owner/repo/issues`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST as the anonymous bot identity.
    async fn post_as_proxy(
        &self,
        path: &str,
        issue: &EncodedIssue,
    ) -> Result<ProxyResponse, TransportError>;

    /// POST as the reporter. Non-success statuses are errors.
    async fn post_as_authenticated(
        &self,
        path: &str,
        issue: &EncodedIssue,
    ) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn post_as_proxy(
        &self,
        path: &str,
        issue: &EncodedIssue,
    ) -> Result<ProxyResponse, TransportError> {
        (**self).post_as_proxy(path, issue).await
    }

    async fn post_as_authenticated(
        &self,
        path: &str,
        issue: &EncodedIssue,
    ) -> Result<Value, TransportError> {
        (**self).post_as_authenticated(path, issue).await
    }
}

//! Issue dispatch.
//!
//! A submission is routed on the pair `(proxy, submit_type)`:
//!
//! ```text
//!  proxy  submit_type            route
//!  -----  ---------------------  -------------------------------------------
//!  true   github-proxy-report    placeholder → public tracker (must be 201),
//!                                real form + public_url → private tracker
//!  false  github-auth-report     encoded form → public tracker as reporter
//!  *      anything else          BadRequest, nothing sent
//! ```
//!
//! In the proxy route the caller gets the public placeholder's JSON back. The
//! private tracker's response is dropped so private report data never flows
//! back to the requester.

use serde_json::Value;

use crate::config::RepoConfig;
use crate::encode::{EncodedIssue, FormEncoder, IssueFormEncoder};
use crate::error::DispatchError;
use crate::form::{IssueForm, SubmitType};
use crate::transport::Transport;

/// Metadata key under which the public placeholder URL is attached to the
/// private report.
pub const PUBLIC_URL_KEY: &str = "public_url";

/// Outcome of the routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Anonymous report: placeholder in public, real content in private.
    Proxy,
    /// Reporter files the issue with their own credentials.
    Authenticated,
    /// Proxy flag and submit type disagree, or the submit type is unknown.
    Reject,
}

impl Route {
    pub fn decide(proxy: bool, submit_type: &SubmitType) -> Self {
        match (proxy, submit_type) {
            (true, SubmitType::ProxyReport) => Route::Proxy,
            (false, SubmitType::AuthReport) => Route::Authenticated,
            (_, SubmitType::ProxyReport | SubmitType::AuthReport | SubmitType::Other(_)) => {
                Route::Reject
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Route::Proxy => "proxy",
            Route::Authenticated => "authenticated",
            Route::Reject => "reject",
        }
    }
}

/// Forwards validated forms to the issue trackers.
pub struct IssueDispatcher<T, E = IssueFormEncoder> {
    public_path: String,
    private_path: String,
    transport: T,
    encoder: E,
}

impl<T: Transport> IssueDispatcher<T> {
    pub fn new(repos: &RepoConfig, transport: T) -> Self {
        Self::with_encoder(repos, transport, IssueFormEncoder)
    }
}

impl<T: Transport, E: FormEncoder> IssueDispatcher<T, E> {
    pub fn with_encoder(repos: &RepoConfig, transport: T, encoder: E) -> Self {
        Self {
            public_path: repos.public_issues_path(),
            private_path: repos.private_issues_path(),
            transport,
            encoder,
        }
    }

    /// Submits `form` and returns the tracker's JSON for the public issue.
    ///
    /// `proxy` states whether the request arrived through the anonymous entry
    /// point. Each call performs fresh submissions; nothing is deduplicated.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::BadRequest`] when the route is rejected or the
    ///   public tracker does not answer a proxy placeholder with 201.
    /// - [`DispatchError::Transport`] for any transport failure, including one
    ///   on the private submission after the public placeholder was created.
    pub async fn dispatch(&self, form: &IssueForm, proxy: bool) -> Result<Value, DispatchError> {
        let route = Route::decide(proxy, &form.submit_type);
        tracing::debug!(
            route = route.as_str(),
            proxy,
            submit_type = %form.submit_type,
            "dispatching issue report"
        );

        match route {
            Route::Proxy => self.report_proxy(form).await,
            Route::Authenticated => self.report_authenticated(form).await,
            Route::Reject => {
                tracing::warn!(proxy, submit_type = %form.submit_type, "rejected issue report");
                Err(DispatchError::BadRequest(format!(
                    "submit_type '{}' is not accepted on the {} endpoint",
                    form.submit_type,
                    if proxy { "proxy" } else { "authenticated" }
                )))
            }
        }
    }

    async fn report_proxy(&self, form: &IssueForm) -> Result<Value, DispatchError> {
        let response = self
            .transport
            .post_as_proxy(&self.public_path, &EncodedIssue::placeholder())
            .await?;

        if !response.is_created() {
            tracing::warn!(
                status = response.status,
                path = %self.public_path,
                "public tracker refused placeholder issue"
            );
            return Err(DispatchError::BadRequest(format!(
                "public tracker answered HTTP {}",
                response.status
            )));
        }

        let public_url = response.html_url().unwrap_or_else(|| {
            tracing::warn!(path = %self.public_path, "created placeholder has no html_url");
            ""
        });

        self.report_private(form, public_url).await?;

        tracing::info!(%public_url, "proxy report filed");
        Ok(response.body)
    }

    /// Files the real report privately. The tracker's response is dropped.
    async fn report_private(&self, form: &IssueForm, public_url: &str) -> Result<(), DispatchError> {
        let tagged = form.with_metadata(PUBLIC_URL_KEY, public_url);
        let issue = self.encoder.encode(&tagged);

        let response = self.transport.post_as_proxy(&self.private_path, &issue).await?;
        if !response.is_created() {
            // Not retried and not surfaced: the public placeholder already exists.
            tracing::warn!(
                status = response.status,
                path = %self.private_path,
                %public_url,
                "private tracker did not create the report"
            );
        }
        Ok(())
    }

    async fn report_authenticated(&self, form: &IssueForm) -> Result<Value, DispatchError> {
        let issue = self.encoder.encode(form);
        let body = self
            .transport
            .post_as_authenticated(&self.public_path, &issue)
            .await?;
        tracing::info!(path = %self.public_path, "authenticated report filed");
        Ok(body)
    }
}

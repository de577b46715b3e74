//! [`Transport`] over the GitHub REST API.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

use crate::config::GithubConfig;
use crate::encode::EncodedIssue;
use crate::error::TransportError;
use crate::transport::{ProxyResponse, Transport};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// GitHub API client.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection
/// pool. The server keeps one bot-only instance and derives a per-request copy
/// carrying the reporter's token with [`GithubClient::with_user_token`].
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    bot_token: Option<String>,
    user_token: Option<String>,
}

impl GithubClient {
    pub fn new(cfg: &GithubConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout())
            .connect_timeout(cfg.connect_timeout())
            .build()?;

        if cfg.bot_token.is_none() {
            tracing::warn!("no GitHub bot token configured; proxy reports will be rejected upstream");
        }

        Ok(Self {
            http,
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            bot_token: cfg.bot_token.clone(),
            user_token: None,
        })
    }

    /// Copy of this client that files authenticated reports as `token`'s owner.
    pub fn with_user_token(&self, token: impl Into<String>) -> Self {
        Self {
            user_token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn has_bot_token(&self) -> bool {
        self.bot_token.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn post(&self, path: &str, token: Option<&str>, issue: &EncodedIssue) -> reqwest::RequestBuilder {
        let mut request = self
            .http
            .post(self.endpoint(path))
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(issue);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }
        request
    }
}

#[async_trait]
impl Transport for GithubClient {
    async fn post_as_proxy(
        &self,
        path: &str,
        issue: &EncodedIssue,
    ) -> Result<ProxyResponse, TransportError> {
        let response = self
            .post(path, self.bot_token.as_deref(), issue)
            .send()
            .await?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        tracing::debug!(path, status, "proxy submission answered");
        Ok(ProxyResponse { status, body })
    }

    async fn post_as_authenticated(
        &self,
        path: &str,
        issue: &EncodedIssue,
    ) -> Result<Value, TransportError> {
        let token = self
            .user_token
            .as_deref()
            .ok_or(TransportError::MissingCredentials)?;

        let response = self.post(path, Some(token), issue).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::InvalidJson(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde_json::json;

    /// Fake GitHub that echoes the Authorization header it saw. Issues posted
    /// to `.../broken/issues` are refused.
    async fn spawn_fake_github() -> String {
        async fn create(
            axum::extract::Path(repo): axum::extract::Path<String>,
            headers: HeaderMap,
            Json(issue): Json<EncodedIssue>,
        ) -> (StatusCode, Json<Value>) {
            if repo == "broken" {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"message": "Validation Failed"})),
                );
            }
            let auth = headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            (
                StatusCode::CREATED,
                Json(json!({
                    "html_url": format!("https://github.com/acme/{repo}/issues/7"),
                    "title": issue.title,
                    "auth": auth,
                })),
            )
        }

        let app = Router::new().route("/repos/acme/{repo}/issues", post(create));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(api_url: String) -> GithubClient {
        let cfg = GithubConfig {
            api_url,
            bot_token: Some("bot-secret".into()),
            ..GithubConfig::default()
        };
        GithubClient::new(&cfg).unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let client = client_for("https://api.example.test/".into());
        assert_eq!(
            client.endpoint("/repos/a/b/issues"),
            "https://api.example.test/repos/a/b/issues"
        );
        assert_eq!(
            client.endpoint("repos/a/b/issues"),
            "https://api.example.test/repos/a/b/issues"
        );
    }

    #[tokio::test]
    async fn proxy_post_uses_bot_token_and_reports_status() {
        let client = client_for(spawn_fake_github().await);
        let response = client
            .post_as_proxy("repos/acme/bugs/issues", &EncodedIssue::placeholder())
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.html_url(), Some("https://github.com/acme/bugs/issues/7"));
        assert_eq!(response.body["auth"], "token bot-secret");
        assert_eq!(response.body["title"], "Placeholder in-moderation title.");
    }

    #[tokio::test]
    async fn proxy_post_returns_non_created_status_without_error() {
        let client = client_for(spawn_fake_github().await);
        let response = client
            .post_as_proxy("repos/acme/broken/issues", &EncodedIssue::placeholder())
            .await
            .unwrap();
        assert_eq!(response.status, 422);
        assert!(!response.is_created());
    }

    #[tokio::test]
    async fn authenticated_post_requires_user_token() {
        let client = client_for(spawn_fake_github().await);
        let err = client
            .post_as_authenticated("repos/acme/bugs/issues", &EncodedIssue::placeholder())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::MissingCredentials));
    }

    #[tokio::test]
    async fn authenticated_post_uses_user_token() {
        let client = client_for(spawn_fake_github().await).with_user_token("user-secret");
        let body = client
            .post_as_authenticated("repos/acme/bugs/issues", &EncodedIssue::placeholder())
            .await
            .unwrap();
        assert_eq!(body["auth"], "token user-secret");
    }

    #[tokio::test]
    async fn authenticated_post_surfaces_error_status() {
        let client = client_for(spawn_fake_github().await).with_user_token("user-secret");
        let err = client
            .post_as_authenticated("repos/acme/broken/issues", &EncodedIssue::placeholder())
            .await
            .unwrap_err();
        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("Validation Failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

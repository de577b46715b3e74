use crate::config::ServerConfig;
use issue_relay::{GithubClient, IssueDispatcher, TransportError};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Bot-authenticated GitHub client (shared connection pool)
    pub github: GithubClient,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: ServerConfig) -> Result<Self, TransportError> {
        let github = GithubClient::new(&config.github)?;

        Ok(Self {
            config: Arc::new(config),
            github,
        })
    }

    /// Dispatcher for one request. Authenticated reports carry the reporter's
    /// token; anonymous ones only use the bot identity.
    pub fn dispatcher(&self, reporter_token: Option<&str>) -> IssueDispatcher<GithubClient> {
        let client = match reporter_token {
            Some(token) => self.github.with_user_token(token),
            None => self.github.clone(),
        };
        IssueDispatcher::new(&self.config.repos, client)
    }

    /// Whether anonymous reports can be filed at all
    pub fn proxy_ready(&self) -> bool {
        self.github.has_bot_token()
    }
}

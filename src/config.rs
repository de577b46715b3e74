//! Relay configuration.
//!
//! Everything the dispatcher and the GitHub client need is carried in a
//! [`RelayConfig`] built once at startup and passed down explicitly. Values can
//! come from any serde source; the server crate layers a config file and
//! environment variables on top of the defaults below.
//!
//! ## Example
//!
//! ```yaml
//! github:
//!   api_url: "https://api.github.com"
//!   user_agent: "issue-relay"
//!   timeout_secs: 30
//! repos:
//!   issues_repo_uri: "webcompat/web-bugs/issues"
//!   private_repo_uri: "webcompat/web-bugs-private/issues"
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for the relay.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub repos: RepoConfig,
}

impl RelayConfig {
    /// Checks every section and reports the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.github.validate()?;
        self.repos.validate()
    }
}

/// Connection settings for the GitHub REST API.
#[derive(Clone, Deserialize, Serialize)]
pub struct GithubConfig {
    /// Base URL of the API, without trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Token of the bot account that files anonymous (proxy) reports.
    #[serde(default, skip_serializing)]
    pub bot_token: Option<String>,

    /// `User-Agent` header sent with every request. GitHub rejects requests
    /// without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            bot_token: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

// Hand-written so the bot token never ends up in logs.
impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl GithubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.api_url)
            .map_err(|e| ConfigError::Invalid(format!("github.api_url: {e}")))?;
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "github.user_agent must not be empty".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "github.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "github.connect_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Identifiers of the public and private issue trackers, e.g.
/// `owner/repo/issues`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepoConfig {
    #[serde(default = "default_issues_repo_uri")]
    pub issues_repo_uri: String,

    #[serde(default = "default_private_repo_uri")]
    pub private_repo_uri: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            issues_repo_uri: default_issues_repo_uri(),
            private_repo_uri: default_private_repo_uri(),
        }
    }
}

impl RepoConfig {
    /// API path of the public tracker (`repos/{issues_repo_uri}`).
    pub fn public_issues_path(&self) -> String {
        repo_path(&self.issues_repo_uri)
    }

    /// API path of the private tracker (`repos/{private_repo_uri}`).
    pub fn private_issues_path(&self) -> String {
        repo_path(&self.private_repo_uri)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("repos.issues_repo_uri", &self.issues_repo_uri),
            ("repos.private_repo_uri", &self.private_repo_uri),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
        }
        if self.issues_repo_uri == self.private_repo_uri {
            return Err(ConfigError::Invalid(
                "public and private trackers must differ".into(),
            ));
        }
        Ok(())
    }
}

fn repo_path(identifier: &str) -> String {
    format!("repos/{}", identifier.trim_matches('/'))
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    concat!("issue-relay/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_issues_repo_uri() -> String {
    "webcompat/web-bugs/issues".to_string()
}

fn default_private_repo_uri() -> String {
    "webcompat/web-bugs-private/issues".to_string()
}

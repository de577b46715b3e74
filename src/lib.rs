//! Relay web-form bug reports to a GitHub issue tracker.
//!
//! Reports arrive either from a logged-in reporter, who files the issue under
//! their own account, or anonymously. Anonymous ("proxy") reports are filed by
//! a bot: the public tracker gets a placeholder issue pending moderation, and
//! the real content goes to a private tracker tagged with the placeholder's
//! URL.
//!
//! ```rust,no_run
//! use issue_relay::{GithubClient, IssueDispatcher, IssueForm, RelayConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RelayConfig::default();
//! let client = GithubClient::new(&config.github)?;
//! let dispatcher = IssueDispatcher::new(&config.repos, client);
//!
//! let form = IssueForm::from_fields([
//!     ("submit_type", "github-proxy-report"),
//!     ("url", "https://example.com"),
//!     ("description", "Login form is cut off"),
//! ])?;
//! let public_issue = dispatcher.dispatch(&form, true).await?;
//! println!("{}", public_issue["html_url"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod form;
pub mod github;
pub mod transport;

pub use config::{GithubConfig, RelayConfig, RepoConfig};
pub use dispatch::{IssueDispatcher, PUBLIC_URL_KEY, Route};
pub use encode::{EncodedIssue, FormEncoder, IssueFormEncoder, PLACEHOLDER_BODY, PLACEHOLDER_TITLE};
pub use error::{ConfigError, DispatchError, FormError, TransportError};
pub use form::{IssueForm, SubmitType};
pub use github::GithubClient;
pub use transport::{ProxyResponse, STATUS_CREATED, Transport};

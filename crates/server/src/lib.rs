//! Issue Relay Server - HTTP front door for bug report submission
//!
//! Browsers post the bug report form here; the server validates it and
//! relays it to GitHub through [`issue_relay::IssueDispatcher`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (503 without a bot token)
//! - `POST /api/v1/issues/proxy` - Anonymous report (moderated)
//! - `POST /api/v1/issues` - Report as the logged-in reporter
//!   (`Authorization: Bearer <github token>`)

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;

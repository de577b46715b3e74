//! Bug report submission endpoints.
//!
//! The endpoint that was hit decides the `proxy` flag: the authenticated
//! route never files as the bot and the anonymous route never uses reporter
//! credentials. Which flow the browser *intended* is carried by the form's
//! `submit_type`; a mismatch is rejected with 400.

use crate::error::{ServerError, ServerResult};
use crate::middleware::ReporterToken;
use crate::state::ServerState;
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Form, Json};
use issue_relay::IssueForm;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

type FormFields = Result<Form<HashMap<String, String>>, FormRejection>;

/// File a report with the reporter's own GitHub credentials.
///
/// `POST /api/v1/issues` (urlencoded form, `Authorization` required)
///
/// Responds 201 with the JSON GitHub returned for the created issue.
pub async fn submit_authenticated(
    State(state): State<Arc<ServerState>>,
    Extension(ReporterToken(token)): Extension<ReporterToken>,
    fields: FormFields,
) -> ServerResult<(StatusCode, Json<Value>)> {
    let form = parse_form(fields)?;
    let issue = state.dispatcher(Some(token.as_str())).dispatch(&form, false).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

/// File an anonymous report through the moderation queue.
///
/// `POST /api/v1/issues/proxy` (urlencoded form)
///
/// Responds 201 with the public placeholder issue. The private copy holding
/// the real report is never echoed back.
pub async fn submit_proxy(
    State(state): State<Arc<ServerState>>,
    fields: FormFields,
) -> ServerResult<(StatusCode, Json<Value>)> {
    let form = parse_form(fields)?;
    let issue = state.dispatcher(None).dispatch(&form, true).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

fn parse_form(fields: FormFields) -> ServerResult<IssueForm> {
    let Form(fields) = fields.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    Ok(IssueForm::try_from(fields)?)
}

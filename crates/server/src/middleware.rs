use crate::error::ServerError;
use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

/// Request identifier, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// GitHub token of a logged-in reporter.
#[derive(Clone)]
pub struct ReporterToken(pub String);

/// Reporter token middleware for authenticated report routes
///
/// Accepts `Authorization: Bearer <token>` or `Authorization: token <token>`.
/// The token itself is never validated here; GitHub does that when the
/// issue is filed.
pub async fn require_reporter_token(
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_token);

    match token {
        Some(token) => {
            request.extensions_mut().insert(ReporterToken(token));
            Ok(next.run(request).await)
        }
        None => Err(ServerError::Authentication(
            "GitHub token required. Provide it as 'Authorization: Bearer <token>'".to_string(),
        )),
    }
}

fn parse_token(header: &str) -> Option<String> {
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("token "))?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Request ID injection middleware
pub async fn request_id(mut request: Request, next: Next) -> Response {
    // Generate or extract request ID
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}

/// Logging middleware
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    tracing::info!(
        method = %method,
        uri = %uri,
        request_id = %request_id,
        "Request started"
    );

    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

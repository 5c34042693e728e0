use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that validates the session token and adds the
/// `AuthenticatedAccount` to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let account = state
        .account_service
        .authenticate(token.as_deref())
        .await
        .map_err(ApiError::from)?;

    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}

/// Bearer token from the Authorization header, `None` when absent.
fn extract_token_from_header(req: &Request) -> Result<Option<String>, ApiError> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    Ok(Some(
        value
            .strip_prefix("Bearer ")
            .unwrap_or(value)
            .trim()
            .to_string(),
    ))
}

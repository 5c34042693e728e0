use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::account::models::AuthenticatedAccount;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .cart_service
        .clear(&account.account_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Cart cleared")))
}

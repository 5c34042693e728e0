use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::account::models::AuthenticatedAccount;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::CartData;
use crate::inbound::http::router::AppState;

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<CartData>, ApiError> {
    state
        .cart_service
        .get_cart(&account.account_id)
        .await
        .map_err(ApiError::from)
        .map(|ref view| ApiSuccess::new(StatusCode::OK, view.into()))
}

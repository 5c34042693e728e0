use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::account::models::AuthenticatedAccount;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::OrderData;
use crate::inbound::http::router::AppState;

/// Orders of the caller, most recent first.
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<Vec<OrderData>>, ApiError> {
    state
        .order_service
        .list_orders(&account.account_id)
        .await
        .map_err(ApiError::from)
        .map(|orders| {
            ApiSuccess::new(
                StatusCode::OK,
                orders.iter().map(OrderData::from).collect(),
            )
        })
}

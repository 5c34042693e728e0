use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::OrderId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::OrderData;
use crate::inbound::http::router::AppState;

pub async fn get_order(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    Path(order_id): Path<String>,
) -> Result<ApiSuccess<OrderData>, ApiError> {
    let order_id = OrderId::from_string(&order_id).map_err(OrderError::from)?;

    state
        .order_service
        .get_order(&account.account_id, &order_id)
        .await
        .map_err(ApiError::from)
        .map(|ref order| ApiSuccess::new(StatusCode::OK, order.into()))
}

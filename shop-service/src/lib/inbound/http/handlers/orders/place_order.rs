use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use crate::domain::account::models::AuthenticatedAccount;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::OrderData;
use crate::inbound::http::router::AppState;

pub async fn place_order(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<PlaceOrderResponseData>, ApiError> {
    state
        .order_service
        .place_order(&account.account_id)
        .await
        .map_err(ApiError::from)
        .map(|ref order| {
            ApiSuccess::new(
                StatusCode::CREATED,
                PlaceOrderResponseData {
                    message: "Order placed successfully".to_string(),
                    order: order.into(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceOrderResponseData {
    pub message: String,
    pub order: OrderData,
}

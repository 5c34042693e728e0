use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::cart::errors::CartError;
use crate::domain::catalog::models::ItemId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::CartData;
use crate::inbound::http::router::AppState;

/// Overwrite a line's quantity. Zero or less removes the line.
pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    Path(item_id): Path<String>,
    Json(body): Json<UpdateCartItemRequest>,
) -> Result<ApiSuccess<CartData>, ApiError> {
    let item_id = ItemId::from_string(&item_id).map_err(CartError::from)?;

    state
        .cart_service
        .set_quantity(&account.account_id, &item_id, body.quantity)
        .await
        .map_err(ApiError::from)
        .map(|ref view| ApiSuccess::new(StatusCode::OK, view.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateCartItemRequest {
    quantity: i64,
}

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::cart::errors::CartError;
use crate::domain::catalog::models::ItemId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::CartData;
use crate::inbound::http::router::AppState;

pub async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    Path(item_id): Path<String>,
) -> Result<ApiSuccess<CartData>, ApiError> {
    let item_id = ItemId::from_string(&item_id).map_err(CartError::from)?;

    state
        .cart_service
        .remove_item(&account.account_id, &item_id)
        .await
        .map_err(ApiError::from)
        .map(|ref view| ApiSuccess::new(StatusCode::OK, view.into()))
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::models::Quantity;
use crate::domain::catalog::models::ItemId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::CartData;
use crate::inbound::http::router::AppState;

pub async fn add_cart_item(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    Json(body): Json<AddCartItemRequest>,
) -> Result<ApiSuccess<CartData>, ApiError> {
    let (item_id, quantity) = body.parse()?;

    state
        .cart_service
        .add_item(&account.account_id, &item_id, quantity)
        .await
        .map_err(ApiError::from)
        .map(|ref view| ApiSuccess::new(StatusCode::OK, view.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddCartItemRequest {
    #[serde(alias = "itemId")]
    item_id: String,
    /// Defaults to one
    quantity: Option<i64>,
}

impl AddCartItemRequest {
    fn parse(self) -> Result<(ItemId, Quantity), CartError> {
        let item_id = ItemId::from_string(&self.item_id)?;
        let quantity = match self.quantity {
            Some(value) => Quantity::new(value)?,
            None => Quantity::ONE,
        };
        Ok((item_id, quantity))
    }
}

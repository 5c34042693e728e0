use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Username;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::models::CartView;
use crate::domain::cart::models::CartViewLine;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderLine;

pub mod accounts;
pub mod carts;
pub mod health;
pub mod orders;

const INVALID_LOGIN_MESSAGE: &str = "Invalid username or password";
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl ApiError {
    /// Log the underlying failure and hide it from the client.
    fn internal(err: impl Display) -> Self {
        tracing::error!(error = %err, "Request failed");
        ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateIdentity(_) => ApiError::Conflict(err.to_string()),
            AccountError::UnknownIdentity(_) | AccountError::BadCredential => {
                ApiError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string())
            }
            AccountError::SessionAlreadyActive => ApiError::Forbidden(err.to_string()),
            AccountError::MissingToken | AccountError::InvalidToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AccountError::InvalidUsername(_) | AccountError::InvalidAccountId(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            AccountError::DatabaseError(_) | AccountError::Unknown(_) => Self::internal(err),
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidItemId(_) | CartError::InvalidQuantity(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            CartError::ItemNotFound(_) | CartError::CartNotFound | CartError::LineNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CartError::CartChanged => ApiError::Conflict(err.to_string()),
            CartError::Catalog(_) | CartError::DatabaseError(_) | CartError::Unknown(_) => {
                Self::internal(err)
            }
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidOrderId(_) => ApiError::UnprocessableEntity(err.to_string()),
            OrderError::EmptyCart => ApiError::BadRequest(err.to_string()),
            OrderError::OrderNotFound(_) | OrderError::ItemNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            OrderError::CartChanged => ApiError::Conflict(err.to_string()),
            OrderError::Catalog(_)
            | OrderError::Corrupt(_)
            | OrderError::DatabaseError(_)
            | OrderError::Unknown(_) => Self::internal(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Public summary of an account. Never carries the hash or the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
}

impl UserData {
    pub fn new(id: &AccountId, username: &Username) -> Self {
        Self {
            id: id.to_string(),
            username: username.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemData {
    pub item_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

impl From<&CartViewLine> for CartItemData {
    fn from(line: &CartViewLine) -> Self {
        Self {
            item_id: line.item.id.to_string(),
            name: line.item.name.clone(),
            price: line.item.price,
            quantity: line.quantity.get(),
            line_total: line.line_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartData {
    pub items: Vec<CartItemData>,
    pub total: Decimal,
}

impl From<&CartView> for CartData {
    fn from(view: &CartView) -> Self {
        Self {
            items: view.lines.iter().map(CartItemData::from).collect(),
            total: view.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLineData {
    pub item_id: String,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

impl From<&OrderLine> for OrderLineData {
    fn from(line: &OrderLine) -> Self {
        Self {
            item_id: line.item_id.to_string(),
            quantity: line.quantity.get(),
            price_at_purchase: line.price_at_purchase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderData {
    pub id: String,
    pub items: Vec<OrderLineData>,
    pub total_amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderData {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            items: order.lines().iter().map(OrderLineData::from).collect(),
            total_amount: order.total_amount(),
            status: order.status().to_string(),
            created_at: order.created_at(),
        }
    }
}

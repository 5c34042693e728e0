use axum::http::StatusCode;
use axum::Extension;

use crate::domain::account::models::AuthenticatedAccount;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;

pub async fn current_account(
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        UserData::new(&account.account_id, &account.username),
    ))
}

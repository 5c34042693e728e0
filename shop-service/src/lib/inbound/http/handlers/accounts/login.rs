use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::SessionGrant;
use crate::domain::account::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A username that could never have been registered is just an unknown identity
    let username = Username::new(body.username.clone())
        .map_err(|_| AccountError::UnknownIdentity(body.username))?;

    state
        .account_service
        .login(LoginCommand {
            username,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref grant| ApiSuccess::new(StatusCode::OK, grant.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserData,
}

impl From<&SessionGrant> for LoginResponseData {
    fn from(grant: &SessionGrant) -> Self {
        Self {
            token: grant.token.clone(),
            expires_at: grant.expires_at,
            user: UserData::new(&grant.account_id, &grant.username),
        }
    }
}

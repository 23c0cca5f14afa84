use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::{ApiError, AppResult};

use super::TokenIssuer;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogoutBody {
    refresh_token: Option<String>,
}

/// Revokes the refresh token, if one is given. Access tokens run out on their own.
#[debug_handler]
pub(crate) async fn logout(
    State(tokens): State<TokenIssuer>,
    Json(LogoutBody { refresh_token }): Json<LogoutBody>,
) -> AppResult<StatusCode> {
    if let Some(refresh_token) = refresh_token {
        let claims = tokens
            .revoke(&refresh_token)
            .await
            .map_err(|_| ApiError::InvalidRefreshToken)?;
        info!(user = %claims.sub, "logged out");
    }
    Ok(StatusCode::NO_CONTENT)
}

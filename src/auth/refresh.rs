use axum::{Json, debug_handler, extract::State};
use serde::Deserialize;
use tracing::debug;

use crate::{ApiError, AppResult, AppState, Store, db, model::User};

use super::{TokenIssuer, TokenKind, TokenPair};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshBody {
    refresh_token: String,
}

/// Trades a refresh token for a new pair carrying the account's current username.
#[debug_handler(state = AppState)]
pub(crate) async fn refresh(
    State(store): State<Store>,
    State(tokens): State<TokenIssuer>,
    Json(RefreshBody { refresh_token }): Json<RefreshBody>,
) -> AppResult<Json<TokenPair>> {
    let claims = match tokens.verify(&refresh_token, TokenKind::Refresh).await {
        Ok(claims) => claims,
        Err(err) => {
            debug!(%err, "refresh refused");
            return Err(ApiError::InvalidRefreshToken.into());
        }
    };

    let Some(user) = db::get::<User>(&*store, &claims.sub).await? else {
        debug!(user = %claims.sub, "refresh for a deleted account");
        return Err(ApiError::InvalidRefreshToken.into());
    };

    Ok(Json(tokens.issue_pair(&user.id, &user.username)?))
}

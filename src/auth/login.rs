use axum::{Json, debug_handler, extract::State};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::{
    ApiError, AppResult, AppState, Store,
    db::{self, Query},
    model::User,
};

use super::{TokenIssuer, TokenPair, verify_password};

#[derive(Deserialize)]
pub(crate) struct LoginBody {
    username: Option<String>,
    pass: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct LoginResponse {
    username: String,
    #[serde(flatten)]
    tokens: TokenPair,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(store): State<Store>,
    State(tokens): State<TokenIssuer>,
    Json(LoginBody { username, pass }): Json<LoginBody>,
) -> AppResult<Json<LoginResponse>> {
    let username = username.filter(|u| !u.is_empty()).ok_or(ApiError::InvalidUsername)?;
    let pass = pass.filter(|p| !p.is_empty()).ok_or(ApiError::InvalidPassword)?;

    let Some(mut user) = db::search::<User>(&*store, &Query::by("username", &username)).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };
    if !verify_password(&pass, &user.pass) {
        return Err(ApiError::IncorrectPassword.into());
    }

    user.last_login = OffsetDateTime::now_utc();
    db::overwrite(&*store, &user).await?;

    info!(user = %user.id, "logged in");
    Ok(Json(LoginResponse {
        tokens: tokens.issue_pair(&user.id, &user.username)?,
        username: user.username,
    }))
}

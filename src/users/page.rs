use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::Serialize;

use crate::{
    ApiError, AppResult, AppState, Store,
    auth::Requester,
    db::{self, Query},
    model::{Profile, User},
    visibility::allowed,
};

#[derive(Serialize)]
pub(crate) struct UserPage {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    /// Absent when hidden from the requester.
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<Profile>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn user_page(
    Path(username): Path<String>,
    State(store): State<Store>,
    requester: Requester,
) -> AppResult<Json<UserPage>> {
    let Some(user) = db::search::<User>(&*store, &Query::by("username", &username)).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };

    let profile = match &user.profile {
        Some(profile) => allowed(&*store, profile, &requester.identifier(), Some(&user)).await,
        None => None,
    };

    Ok(Json(UserPage {
        id: user.id.clone(),
        username: user.username.clone(),
        profile,
    }))
}

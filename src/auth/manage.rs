use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    ApiError, AppResult, AppState, Store,
    db::{self, Query, StoreError},
    model::User,
};

use super::{Requester, create_user as insert_user, hash_password, verify_password};

fn valid_username(username: &str) -> bool {
    (4..=32).contains(&username.chars().count())
}

#[derive(Deserialize)]
pub(crate) struct NewUserBody {
    username: Option<String>,
    pass: Option<String>,
    email: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct UserCreated {
    #[serde(rename = "_id")]
    id: String,
    username: String,
}

/// Signs up. The username defaults to the email address.
#[debug_handler(state = AppState)]
pub(crate) async fn create_user(
    State(store): State<Store>,
    Json(NewUserBody { username, pass, email }): Json<NewUserBody>,
) -> AppResult<(StatusCode, Json<UserCreated>)> {
    let email = email.filter(|e| !e.is_empty());
    let username = username.filter(|u| !u.is_empty()).or_else(|| email.clone());

    let pass = pass.filter(|p| !p.is_empty()).ok_or(ApiError::InvalidPassword)?;
    let username = username.filter(|u| valid_username(u)).ok_or(ApiError::InvalidUsername)?;
    let email = email.ok_or(ApiError::InvalidEmail)?;

    let clash = Query::by("email", &email).or("username", &username);
    if db::search::<User>(&*store, &clash).await?.is_some() {
        return Err(ApiError::UsernameOrEmailAlreadyExists.into());
    }

    let user = match insert_user(&*store, username, email, hash_password(&pass)?).await {
        Ok(user) => user,
        Err(StoreError::Conflict(_)) => return Err(ApiError::UsernameOrEmailAlreadyExists.into()),
        Err(err) => return Err(err.into()),
    };

    info!(user = %user.id, username = %user.username, "signed up");
    Ok((
        StatusCode::CREATED,
        Json(UserCreated {
            id: user.id,
            username: user.username,
        }),
    ))
}

#[derive(Deserialize)]
pub(crate) struct DeleteUserBody {
    username: Option<String>,
    pass: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_user(
    State(store): State<Store>,
    Json(DeleteUserBody { username, pass }): Json<DeleteUserBody>,
) -> AppResult<StatusCode> {
    let username = username.filter(|u| !u.is_empty()).ok_or(ApiError::InvalidUsername)?;
    let pass = pass.filter(|p| !p.is_empty()).ok_or(ApiError::InvalidPassword)?;

    let Some(user) = db::search::<User>(&*store, &Query::by("username", &username)).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };
    if !verify_password(&pass, &user.pass) {
        return Err(ApiError::IncorrectPassword.into());
    }

    db::delete_item::<User>(&*store, &user.id).await?;
    info!(user = %user.id, "deleted account");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub(crate) struct UpdateUserBody {
    username: Option<String>,
    email: Option<String>,
    private: Option<bool>,
}

#[derive(Serialize)]
pub(crate) struct UserUpdated {
    username: String,
    email: String,
    private: bool,
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_user(
    State(store): State<Store>,
    requester: Requester,
    Json(UpdateUserBody { username, email, private }): Json<UpdateUserBody>,
) -> AppResult<Json<UserUpdated>> {
    let username = username.filter(|u| !u.is_empty());
    let email = email.filter(|e| !e.is_empty());
    if username.is_none() && email.is_none() && private.is_none() {
        return Err(ApiError::NoChanges.into());
    }
    if username.as_deref().is_some_and(|u| !valid_username(u)) {
        return Err(ApiError::InvalidUsername.into());
    }

    let mut clash = Query::default();
    if let Some(username) = &username {
        clash = clash.or("username", username);
    }
    if let Some(email) = &email {
        clash = clash.or("email", email);
    }
    if let Some(other) = db::search::<User>(&*store, &clash).await? {
        if other.id != requester.id {
            return Err(ApiError::UsernameOrEmailAlreadyExists.into());
        }
    }

    let Some(mut user) = db::get::<User>(&*store, &requester.id).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };
    if let Some(username) = username {
        user.username = username;
    }
    if let Some(email) = email {
        user.email = email;
    }
    if let Some(private) = private {
        user.prefs.private = private;
    }
    db::overwrite(&*store, &user).await?;

    Ok(Json(UserUpdated {
        username: user.username,
        email: user.email,
        private: user.prefs.private,
    }))
}

use axum::{Json, debug_handler, extract::State};
use serde::Deserialize;

use crate::{
    ApiError, AppResult, AppState, Store,
    auth::Requester,
    db,
    model::{Profile, RestrictionLevel, User},
};

use super::profile_mut;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileBody {
    name: Option<String>,
    bio: Option<String>,
    icon: Option<String>,
    restricted_to: Option<RestrictionLevel>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_profile(
    State(store): State<Store>,
    requester: Requester,
    Json(ProfileBody { name, bio, icon, restricted_to }): Json<ProfileBody>,
) -> AppResult<Json<Profile>> {
    if name.is_none() && bio.is_none() && icon.is_none() && restricted_to.is_none() {
        return Err(ApiError::NoChanges.into());
    }

    let Some(mut user) = db::get::<User>(&*store, &requester.id).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };

    let profile = profile_mut(&mut user);
    if let Some(name) = name {
        profile.name = name;
    }
    if bio.is_some() {
        profile.bio = bio;
    }
    if icon.is_some() {
        profile.icon = icon;
    }
    if restricted_to.is_some() {
        profile.restricted_to = restricted_to;
    }
    let profile = profile.clone();

    db::overwrite(&*store, &user).await?;
    Ok(Json(profile))
}

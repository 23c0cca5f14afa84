mod friend;
mod page;
mod profile;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::{
    AppState,
    model::{Profile, User, new_id},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", patch(profile::update_profile))
        .route("/u/{username}", get(page::user_page))
        .route("/u/{username}/friend", post(friend::befriend))
}

/// Stored users always have a profile; this only guards hand-edited documents.
pub(crate) fn profile_mut(user: &mut User) -> &mut Profile {
    user.profile
        .get_or_insert_with(|| Profile::new(new_id("profile"), user.username.clone()))
}

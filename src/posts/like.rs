use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::Serialize;

use crate::{
    ApiError, AppResult, AppState, Store,
    auth::Requester,
    db,
    model::User,
    users::profile_mut,
};

use super::visible_post;

#[derive(Serialize)]
pub(crate) struct Likes {
    likes: u64,
}

#[debug_handler(state = AppState)]
pub(crate) async fn like_post(
    Path(id): Path<String>,
    State(store): State<Store>,
    requester: Requester,
) -> AppResult<Json<Likes>> {
    let (mut post, _) = visible_post(&*store, &id, &requester).await?;
    let Some(mut user) = db::get::<User>(&*store, &requester.id).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };

    let liked = &mut profile_mut(&mut user).liked_posts;
    if liked.iter().any(|item| item.is(&post.id)) {
        return Err(ApiError::NoChanges.into());
    }
    liked.push(post.id.clone().into());
    post.likes += 1;

    db::overwrite(&*store, &post).await?;
    db::overwrite(&*store, &user).await?;
    Ok(Json(Likes { likes: post.likes }))
}

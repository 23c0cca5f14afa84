use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::{
    ApiError, AppResult, AppState, Store,
    auth::Requester,
    db,
    model::{Edit, Post, RestrictionLevel, User, new_id},
    users::profile_mut,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewPostBody {
    title: String,
    content: String,
    restricted_to: Option<RestrictionLevel>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_post(
    State(store): State<Store>,
    requester: Requester,
    Json(NewPostBody { title, content, restricted_to }): Json<NewPostBody>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let Some(mut user) = db::get::<User>(&*store, &requester.id).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };

    let post = Post {
        id: new_id("post"),
        owner: requester.identifier(),
        restricted_to,
        title,
        content: vec![Edit::new(content, None)],
        likes: 0,
        comments: Vec::new(),
    };
    db::create_item(&*store, &post).await?;

    profile_mut(&mut user).posts.push(post.id.clone().into());
    db::overwrite(&*store, &user).await?;

    info!(post = %post.id, owner = %requester.id, "posted");
    Ok((StatusCode::CREATED, Json(post)))
}

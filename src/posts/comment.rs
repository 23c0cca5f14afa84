use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    ApiError, AppResult, AppState, Store,
    auth::Requester,
    db,
    model::{Comment, Edit, RestrictionLevel, User, new_id},
    users::profile_mut,
};

use super::visible_post;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewCommentBody {
    content: String,
    restricted_to: Option<RestrictionLevel>,
}

/// Comments on a post the requester can see.
#[debug_handler(state = AppState)]
pub(crate) async fn new_comment(
    Path(id): Path<String>,
    State(store): State<Store>,
    requester: Requester,
    Json(NewCommentBody { content, restricted_to }): Json<NewCommentBody>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let (mut post, _) = visible_post(&*store, &id, &requester).await?;
    let Some(mut user) = db::get::<User>(&*store, &requester.id).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };

    let comment = Comment {
        id: new_id("comment"),
        owner: requester.identifier(),
        restricted_to,
        content: vec![Edit::new(content, None)],
        likes: 0,
    };
    db::create_item(&*store, &comment).await?;

    post.comments.push(comment.id.clone().into());
    db::overwrite(&*store, &post).await?;

    profile_mut(&mut user).comments.push(comment.id.clone().into());
    db::overwrite(&*store, &user).await?;

    info!(comment = %comment.id, post = %post.id, "commented");
    Ok((StatusCode::CREATED, Json(comment)))
}

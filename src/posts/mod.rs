mod comment;
mod edit;
mod like;
mod new;
mod page;

use axum::{
    Router,
    routing::{get, post},
};
use futures_util::future::try_join_all;

use crate::{
    ApiError, AppResult, AppState,
    auth::Requester,
    db::{self, DocumentStore, StoreResult},
    model::{Comment, Identifier, Post},
    visibility::allowed,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", post(new::new_post))
        .route("/posts/{id}", get(page::post).patch(edit::edit_post))
        .route("/posts/{id}/like", post(like::like_post))
        .route("/posts/{id}/comments", post(comment::new_comment))
}

/// Swaps the post's comment keys for the comment documents. Comments that
/// no longer exist are dropped.
async fn load_comments(store: &dyn DocumentStore, post: &mut Post) -> StoreResult<()> {
    let comments =
        try_join_all(post.comments.iter().map(|item| db::resolve::<Comment>(store, item))).await?;
    post.comments = comments
        .into_iter()
        .flatten()
        .map(|comment| Identifier::Resolved(Box::new(comment)))
        .collect();
    Ok(())
}

/// Loads a post as stored, together with the part of it `requester` may
/// read, comments included.
pub(crate) async fn visible_post(
    store: &dyn DocumentStore,
    id: &str,
    requester: &Requester,
) -> AppResult<(Post, Post)> {
    let Some(post) = db::get::<Post>(store, id).await? else {
        return Err(ApiError::NotFound.into());
    };

    let mut full = post.clone();
    load_comments(store, &mut full).await?;
    let Some(view) = allowed(store, &full, &requester.identifier(), None).await else {
        return Err(ApiError::Forbidden.into());
    };
    Ok((post, view))
}

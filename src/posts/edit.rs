use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::{
    ApiError, AppResult, AppState, Store,
    auth::Requester,
    db,
    model::{Content, Edit, Post, RestrictionLevel},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EditPostBody {
    content: Option<String>,
    /// Level of the new revision only.
    edit_restricted_to: Option<RestrictionLevel>,
    restricted_to: Option<RestrictionLevel>,
}

/// Appends a revision and/or changes the post's level. Owner only.
#[debug_handler(state = AppState)]
pub(crate) async fn edit_post(
    Path(id): Path<String>,
    State(store): State<Store>,
    requester: Requester,
    Json(EditPostBody { content, edit_restricted_to, restricted_to }): Json<EditPostBody>,
) -> AppResult<Json<Post>> {
    let Some(mut post) = db::get::<Post>(&*store, &id).await? else {
        return Err(ApiError::NotFound.into());
    };
    if !post.owner.is(&requester.id) {
        return Err(ApiError::Forbidden.into());
    }
    let content = content.filter(|content| {
        post.current() != Some(content) || edit_restricted_to.is_some()
    });
    if content.is_none() && restricted_to.is_none() {
        return Err(ApiError::NoChanges.into());
    }

    if let Some(content) = content {
        post.push_edit(Edit::new(content, edit_restricted_to));
    }
    if restricted_to.is_some() {
        post.restricted_to = restricted_to;
    }
    db::overwrite(&*store, &post).await?;

    Ok(Json(post))
}

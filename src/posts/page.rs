use axum::{
    Json, debug_handler,
    extract::{Path, State},
};

use crate::{AppResult, AppState, Store, auth::Requester, model::Post};

use super::visible_post;

#[debug_handler(state = AppState)]
pub(crate) async fn post(
    Path(id): Path<String>,
    State(store): State<Store>,
    requester: Requester,
) -> AppResult<Json<Post>> {
    let (_, view) = visible_post(&*store, &id, &requester).await?;
    Ok(Json(view))
}

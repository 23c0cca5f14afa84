use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use time::OffsetDateTime;

use crate::{
    ApiError, AppResult, AppState, Store,
    auth::Requester,
    db,
    model::Dm,
    visibility::allowed,
};

/// Only the two participants can read a message; the recipient reading it marks it read.
#[debug_handler(state = AppState)]
pub(crate) async fn read_dm(
    Path(id): Path<String>,
    State(store): State<Store>,
    requester: Requester,
) -> AppResult<Json<Dm>> {
    let Some(mut dm) = db::get::<Dm>(&*store, &id).await? else {
        return Err(ApiError::NotFound.into());
    };
    if dm.is_expired_at(OffsetDateTime::now_utc()) {
        return Err(ApiError::NotFound.into());
    }
    if !dm.is_member(&requester.id) {
        return Err(ApiError::Forbidden.into());
    }

    if dm.to.is(&requester.id) && !dm.read {
        dm.read = true;
        db::overwrite(&*store, &dm).await?;
    }

    let Some(view) = allowed(&*store, &dm, &requester.identifier(), None).await else {
        return Err(ApiError::Forbidden.into());
    };
    Ok(Json(view))
}

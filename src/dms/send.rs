use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::{
    ApiError, AppResult, AppState, Store,
    auth::Requester,
    db::{self, Query},
    model::{Dm, Edit, User, new_id},
    users::profile_mut,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendDmBody {
    /// Recipient's username.
    to: String,
    content: String,
    expires_in_secs: Option<i64>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn send_dm(
    State(store): State<Store>,
    requester: Requester,
    Json(SendDmBody { to, content, expires_in_secs }): Json<SendDmBody>,
) -> AppResult<(StatusCode, Json<Dm>)> {
    let expires_at = match expires_in_secs {
        None => None,
        Some(secs) if secs > 0 => Some(
            OffsetDateTime::now_utc()
                .checked_add(Duration::seconds(secs))
                .ok_or(ApiError::InvalidExpiry)?,
        ),
        Some(_) => return Err(ApiError::InvalidExpiry.into()),
    };

    let Some(mut recipient) = db::search::<User>(&*store, &Query::by("username", &to)).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };
    if recipient.id == requester.id {
        return Err(ApiError::InvalidUsername.into());
    }
    let Some(mut sender) = db::get::<User>(&*store, &requester.id).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };

    let dm = Dm {
        id: new_id("dm"),
        owner: requester.identifier(),
        to: recipient.id.clone().into(),
        content: vec![Edit::new(content, None)],
        expires_at,
        read: false,
    };
    db::create_item(&*store, &dm).await?;

    profile_mut(&mut sender)
        .conversations
        .entry(recipient.id.clone())
        .or_default()
        .push(dm.id.clone().into());
    profile_mut(&mut recipient)
        .conversations
        .entry(sender.id.clone())
        .or_default()
        .push(dm.id.clone().into());
    db::overwrite(&*store, &sender).await?;
    db::overwrite(&*store, &recipient).await?;

    info!(dm = %dm.id, from = %sender.id, to = %recipient.id, "sent dm");
    Ok((StatusCode::CREATED, Json(dm)))
}

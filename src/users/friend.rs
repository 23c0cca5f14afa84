use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::info;

use crate::{
    ApiError, AppResult, AppState, Store,
    auth::Requester,
    db::{self, Query},
    model::{Identifier, User},
};

use super::profile_mut;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Friendship {
    Requested,
    Friends,
}

#[derive(Serialize)]
pub(crate) struct FriendResponse {
    status: Friendship,
}

fn contains(list: &[Identifier<User>], key: &str) -> bool {
    list.iter().any(|item| item.is(key))
}

/// Sends `them` a friend request from `me`, or accepts theirs.
pub(crate) fn befriend_users(me: &mut User, them: &mut User) -> Result<Friendship, ApiError> {
    let (my_id, their_id) = (me.id.clone(), them.id.clone());
    let mine = profile_mut(me);
    if contains(&mine.friends, &their_id) || contains(&mine.friend_requests.outgoing, &their_id) {
        return Err(ApiError::NoChanges);
    }

    if contains(&mine.friend_requests.incoming, &their_id) {
        mine.friend_requests.incoming.retain(|item| !item.is(&their_id));
        mine.friends.push(their_id.into());

        let theirs = profile_mut(them);
        theirs.friend_requests.outgoing.retain(|item| !item.is(&my_id));
        theirs.friends.push(my_id.into());
        Ok(Friendship::Friends)
    } else {
        mine.friend_requests.outgoing.push(their_id.into());
        profile_mut(them).friend_requests.incoming.push(my_id.into());
        Ok(Friendship::Requested)
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn befriend(
    Path(username): Path<String>,
    State(store): State<Store>,
    requester: Requester,
) -> AppResult<Json<FriendResponse>> {
    let Some(mut them) = db::search::<User>(&*store, &Query::by("username", &username)).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };
    if them.id == requester.id {
        return Err(ApiError::InvalidUsername.into());
    }
    let Some(mut me) = db::get::<User>(&*store, &requester.id).await? else {
        return Err(ApiError::UsernameNotFound.into());
    };

    let status = befriend_users(&mut me, &mut them)?;
    db::overwrite(&*store, &me).await?;
    db::overwrite(&*store, &them).await?;

    info!(from = %me.id, to = %them.id, ?status, "friendship");
    Ok(Json(FriendResponse { status }))
}

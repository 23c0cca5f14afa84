mod blacklist;
mod login;
mod logout;
mod manage;
mod password;
mod refresh;
mod requester;
mod tokens;

pub use blacklist::Blacklist;
pub use password::{hash_password, verify_password};
pub use requester::Requester;
pub use tokens::{ACCESS_VALID, Claims, REFRESH_VALID, TokenError, TokenIssuer, TokenKind, TokenPair};

use axum::{
    Router,
    routing::{delete, post, put},
};
use time::OffsetDateTime;

use crate::{
    AppState,
    db::{self, DocumentStore, StoreResult},
    model::{Preferences, Profile, User, new_id},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login::login))
        .route("/refresh", post(refresh::refresh))
        .route("/logout", delete(logout::logout))
        .route(
            "/manageuser",
            put(manage::create_user)
                .delete(manage::delete_user)
                .patch(manage::update_user),
        )
}

pub(crate) async fn create_user(
    store: &dyn DocumentStore,
    username: String,
    email: String,
    pass_hash: String,
) -> StoreResult<User> {
    let now = OffsetDateTime::now_utc();
    let user = User {
        id: new_id("user"),
        restricted_to: None,
        profile: Some(Profile::new(new_id("profile"), username.clone())),
        username,
        email,
        pass: pass_hash,
        signed_up: now,
        last_login: now,
        prefs: Preferences::default(),
    };

    db::create_item(store, &user).await?;
    Ok(user)
}

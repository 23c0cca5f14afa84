pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod dms;
pub mod model;
pub mod posts;
pub mod users;
pub mod visibility;

pub use appresult::{ApiError, AppError, AppResult};

use std::sync::Arc;

use axum::{Router, extract::FromRef};
use tower_http::trace::TraceLayer;

use crate::{auth::TokenIssuer, db::DocumentStore};

pub type Store = Arc<dyn DocumentStore>;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenIssuer,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(posts::router())
        .merge(dms::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

mod read;
mod send;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dms", post(send::send_dm))
        .route("/dms/{id}", get(read::read_dm))
}

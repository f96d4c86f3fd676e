use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, sessions, status};
use crate::state::AppState;
use std::sync::Arc;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(sessions::start_session).post(sessions::join_room))
        .route("/connect", post(sessions::connect))
        .route("/status/{pid}", get(status::get_status))
        .route("/health", get(api::health_check))
        .layer(TraceLayer::new_for_http())
}

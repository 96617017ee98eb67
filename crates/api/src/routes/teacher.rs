use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/teachers",
            post(handlers::teacher::create_teacher).get(handlers::teacher::list_teachers),
        )
        .route("/api/teachers/:id", get(handlers::teacher::get_teacher))
        .route(
            "/api/teachers/:id/availability",
            put(handlers::teacher::replace_availability),
        )
}

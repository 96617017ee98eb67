use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/tickets",
            post(handlers::ticket::submit_ticket).get(handlers::ticket::list_my_tickets),
        )
        .route("/api/tickets/:id", get(handlers::ticket::get_ticket))
        .route(
            "/api/tickets/:id/response",
            post(handlers::ticket::respond_ticket),
        )
        .route(
            "/api/tickets/:id/cancel",
            post(handlers::ticket::cancel_ticket),
        )
        .route(
            "/api/teachers/:id/tickets",
            get(handlers::ticket::list_teacher_tickets),
        )
        .route(
            "/api/teachers/:id/metrics",
            get(handlers::ticket::teacher_metrics),
        )
}

//! # After-Hours Connect API
//!
//! The API crate provides the web server implementation for the
//! After-Hours Connect scheduling service. It defines RESTful endpoints
//! for the teacher directory, ticket submission and workflow, and the
//! next-slot query.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like error handling
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Persistence is reached only
//! through the core store traits, so handlers run identically against
//! Postgres in production and in-memory stores in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for logging and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use afterhours_core::scheduler::AvailabilityScheduler;
use afterhours_core::store::{TeacherDirectory, TicketStore};
use afterhours_db::stores::{PgTeacherDirectory, PgTicketStore};

use crate::config::AfterHoursWindow;

/// Shared application state that is accessible to all request handlers
///
/// The stores are injected as trait objects: handlers and the scheduler
/// never know whether they are talking to Postgres or an in-memory fake.
pub struct ApiState {
    /// Teacher directory store
    pub directory: Arc<dyn TeacherDirectory>,
    /// Ticket store
    pub tickets: Arc<dyn TicketStore>,
    /// Slot search + booking service
    pub scheduler: AvailabilityScheduler,
    /// Optional daily submission window
    pub window: AfterHoursWindow,
}

impl ApiState {
    pub fn new(
        directory: Arc<dyn TeacherDirectory>,
        tickets: Arc<dyn TicketStore>,
        search_days: u32,
        window: AfterHoursWindow,
    ) -> Self {
        let scheduler = AvailabilityScheduler::new(directory.clone(), tickets.clone())
            .with_search_days(search_days);
        Self {
            directory,
            tickets,
            scheduler,
            window,
        }
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Teacher directory endpoints
        .merge(routes::teacher::routes())
        // Ticket submission and workflow endpoints
        .merge(routes::ticket::routes())
        // Next-slot query endpoints
        .merge(routes::availability::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and database
/// connection.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Wire the Postgres stores into shared state
    let directory: Arc<dyn TeacherDirectory> = Arc::new(PgTeacherDirectory::new(db_pool.clone()));
    let tickets: Arc<dyn TicketStore> = Arc::new(PgTicketStore::new(db_pool));
    let state = Arc::new(ApiState::new(
        directory,
        tickets,
        config.search_days,
        config.window.clone(),
    ));

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(
                origins
                    .iter()
                    .map(|origin| origin.parse::<axum::http::HeaderValue>().unwrap())
                    .collect::<Vec<_>>(),
            )
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(tower_http::timeout::TimeoutLayer::new(
        std::time::Duration::from_secs(config.request_timeout),
    ));

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

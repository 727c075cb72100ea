use axum::{Router, routing::post};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::session::SearchSession;

pub mod handlers;
pub mod models;

pub fn create_router(session: Arc<SearchSession>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/api/search", post(handlers::search_handler))
        .with_state(session)
        // Static file serving for the widget UI
        .nest_service("/", ServeDir::new("static"))
        .layer(cors)
}

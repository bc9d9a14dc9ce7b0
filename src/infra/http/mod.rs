//! HTTP surface mapping the API contract onto the services.

mod error;
mod handlers;
mod middleware;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, put},
};

use crate::{
    application::{drafts::DraftService, tips::TipService},
    infra::db::PostgresRepositories,
};

#[derive(Clone)]
pub struct ApiState {
    pub tips: Arc<TipService>,
    pub drafts: Arc<DraftService>,
    pub db: Arc<PostgresRepositories>,
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/tip/random", get(handlers::get_random_tip))
        .route(
            "/api/tip",
            get(handlers::list_tips)
                .post(handlers::create_tip)
                .patch(handlers::update_tip),
        )
        .route(
            "/api/tip/{id}",
            get(handlers::get_tip_by_id).delete(handlers::delete_tip),
        )
        .route("/api/draft", put(handlers::upsert_draft))
        .route("/api/draft/{session_id}", get(handlers::list_drafts))
        .route("/healthz", get(handlers::health))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}

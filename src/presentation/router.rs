use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    accept_offer_handler, add_on_handler, availability_handler, cancel_job_handler,
    create_job_handler, current_offer_handler, decline_offer_handler, get_job_handler,
    go_offline_handler, health_handler, job_timeline_handler, list_jobs_handler,
    transition_job_handler, wallet_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/v1/jobs",
            post(create_job_handler).get(list_jobs_handler),
        )
        .route("/api/v1/jobs/{job_id}", get(get_job_handler))
        .route("/api/v1/jobs/{job_id}/timeline", get(job_timeline_handler))
        .route(
            "/api/v1/jobs/{job_id}/transition",
            post(transition_job_handler),
        )
        .route("/api/v1/jobs/{job_id}/cancel", post(cancel_job_handler))
        .route("/api/v1/jobs/{job_id}/add-ons", post(add_on_handler))
        .route("/api/v1/dispatch/available", post(availability_handler))
        .route(
            "/api/v1/dispatch/{electrician_id}/offer",
            get(current_offer_handler),
        )
        .route(
            "/api/v1/dispatch/{electrician_id}/accept",
            post(accept_offer_handler),
        )
        .route(
            "/api/v1/dispatch/{electrician_id}/decline",
            post(decline_offer_handler),
        )
        .route(
            "/api/v1/dispatch/{electrician_id}/offline",
            post(go_offline_handler),
        )
        .route(
            "/api/v1/electricians/{electrician_id}/wallet",
            get(wallet_handler),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

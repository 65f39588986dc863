pub mod api;
mod middleware;

pub use api::{ApiState, build_api_router};
pub use middleware::{RequestContext, log_responses, set_request_context};

use crate::application::error::ErrorReport;
use crate::application::repos::RepoError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Router, middleware as axum_middleware, routing::get};

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

async fn health(State(state): State<ApiState>) -> Response {
    db_health_response(state.health.ping().await)
}

/// The complete application router: the catalog API plus the health check.
pub fn build_router(state: ApiState) -> Router {
    build_api_router()
        .route("/health", get(health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

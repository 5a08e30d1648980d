//! axum routes.
//!
//! | Method | Path           | Body            | Response                  |
//! |--------|----------------|-----------------|---------------------------|
//! | POST   | `/api/recipes` | `RecipeRequest` | `RecipeResponse`          |
//! | GET    | `/api/health`  |                 | [`HealthResponse`]        |
//!
//! `/api/recipes` answers 400 for a malformed body or invalid query, 500 when
//! no source could answer, and 200 otherwise. Failures still carry a
//! `RecipeResponse` with `success: false` and a message.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::cache::CachesStatus;
use crate::types::{RecipeRequest, RecipeResponse};
use crate::version::BuildInfo;
use crate::{EldhrimnirError, RecipeAgent};

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<RecipeAgent>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: String,
    pub build: BuildInfo,
    pub caches: CachesStatus,
}

/// Build the application router.
pub fn router(agent: Arc<RecipeAgent>) -> Router {
    Router::new()
        .route("/api/recipes", post(recipes))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { agent })
}

/// POST /api/recipes
async fn recipes(
    State(state): State<AppState>,
    body: Result<Json<RecipeRequest>, JsonRejection>,
) -> (StatusCode, Json<RecipeResponse>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "rejected request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(RecipeResponse::failure(format!(
                    "invalid request body: {}",
                    rejection.body_text()
                ))),
            );
        }
    };

    let result = match request.into_query() {
        Ok(query) => state.agent.answer(&query).await,
        Err(e) => Err(e),
    };
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(EldhrimnirError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(RecipeResponse::from_result(result)))
}

/// GET /api/health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let build = BuildInfo::current();
    Json(HealthResponse {
        status: "ok",
        service: "eldhrimnir",
        version: build.version_string(),
        build,
        caches: state.agent.caches().status(),
    })
}

// Route exports
pub mod booking;
pub mod chat;
pub mod psw;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use validator::ValidationErrors;

use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::{ErrorResponse, HealthResponse, SeedResponse};
use crate::services::{sample_workers, Store, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

impl AppState {
    pub fn new(store: Store, matcher: Matcher, matching: MatchingSettings) -> Self {
        Self {
            store: Arc::new(store),
            matcher,
            matching,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .route("/seed", web::post().to(seed))
            .configure(psw::configure)
            .configure(booking::configure)
            .configure(chat::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = match state.store.list_workers().await {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::warn!("Store check failed during health check: {}", e);
            "degraded"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Seed the sample roster
///
/// POST /api/seed
async fn seed(state: web::Data<AppState>) -> impl Responder {
    match state.store.seed(sample_workers()).await {
        Ok(added) => HttpResponse::Ok().json(SeedResponse {
            message: if added == 0 {
                "Store already has workers".to_string()
            } else {
                format!("Seeded {} workers", added)
            },
            added,
        }),
        Err(e) => store_failure("Failed to seed workers", e),
    }
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {:?}", errors);
    error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string())
}

pub(crate) fn not_found(what: &str, id: &str) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, &format!("{} not found", what), format!("No {} with id {}", what.to_lowercase(), id))
}

/// Map a store error onto 404 or 500
pub(crate) fn store_failure(context: &str, err: StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound(what) => error_response(StatusCode::NOT_FOUND, "Not found", what),
        err => {
            tracing::error!("{}: {}", context, err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context, err.to_string())
        }
    }
}

/// JSON error body for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

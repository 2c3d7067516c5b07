use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use super::{error_response, not_found, store_failure, validation_failed, AppState};
use crate::models::{AvailablePswsRequest, AvailablePswsResponse, Location, SearchPswsQuery, SearchPswsResponse};

/// Configure all worker routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/psw/available", web::post().to(available_psws))
        .route("/psw/search", web::get().to(search_psws))
        .route("/psw/{psw_id}", web::get().to(get_psw));
}

/// Find available workers endpoint
///
/// POST /api/psw/available
///
/// Request body:
/// ```json
/// {
///   "location": {"latitude": 43.6532, "longitude": -79.3832},
///   "radius": 15,
///   "desiredDate": "2024-01-15",
///   "startTime": "09:00",
///   "endTime": "12:00",
///   "serviceType": "General Support",
///   "limit": 5
/// }
/// ```
async fn available_psws(state: web::Data<AppState>, req: web::Json<AvailablePswsRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let request = req.to_match_request();
    let limit = state.matching.clamp_limit(req.limit);

    tracing::info!(
        "Finding workers within {} km on {} {}-{}, limit: {}",
        request.effective_radius_km(),
        request.date,
        request.start_time,
        request.end_time,
        limit
    );

    let roster = match state.store.list_workers().await {
        Ok(workers) => workers,
        Err(e) => return store_failure("Failed to retrieve available PSWs", e),
    };

    let result = state.matcher.find_matches(&request, roster, Some(limit));

    tracing::info!(
        "Returning {} workers ({} eligible of {})",
        result.matches.len(),
        result.eligible,
        result.total_candidates
    );

    HttpResponse::Ok().json(AvailablePswsResponse {
        psw_profiles: result.matches,
        total_count: result.eligible,
    })
}

/// Free-text search over names and service labels
///
/// GET /api/psw/search?query=companion&lat=43.65&lng=-79.38
async fn search_psws(state: web::Data<AppState>, query: web::Query<SearchPswsQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let roster = match state.store.list_workers().await {
        Ok(workers) => workers,
        Err(e) => return store_failure("Failed to search PSWs", e),
    };

    let needle = query.query.to_lowercase();
    let found: Vec<_> = roster
        .into_iter()
        .filter(|w| {
            w.name.to_lowercase().contains(&needle)
                || w.service_types.iter().any(|s| s.to_lowercase().contains(&needle))
        })
        .collect();

    let results = state.matcher.rank(found, &Location::new(query.lat, query.lng));
    tracing::debug!("Search '{}' matched {} workers", query.query, results.len());

    HttpResponse::Ok().json(SearchPswsResponse {
        total_count: results.len(),
        results,
    })
}

/// GET /api/psw/{psw_id}
async fn get_psw(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let psw_id = path.into_inner();
    if psw_id.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", "pswId is required");
    }

    match state.store.get_worker(&psw_id).await {
        Ok(Some(worker)) => HttpResponse::Ok().json(worker),
        Ok(None) => not_found("PSW", &psw_id),
        Err(e) => store_failure("Failed to retrieve PSW profile", e),
    }
}

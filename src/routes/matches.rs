use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::Matcher;
use crate::models::{ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse};
use crate::precheck::PrecheckEngine;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub precheck: Arc<PrecheckEngine>,
}

/// Configure match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "adopter": { "living_space": "small_apartment", ... },
///   "candidates": [{ "id": "p1", "name": "Rex", ... }],
///   "top_k": 3
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // Cap top_k to prevent oversized responses
    let top_k = req.top_k.clamp(1, 50);
    let total_candidates = req.candidates.len();

    tracing::info!(
        "Ranking {} candidates (top {})",
        total_candidates,
        top_k
    );

    let matches = state
        .matcher
        .find_best_matches(&req.adopter, &req.candidates, top_k)
        .await;

    tracing::debug!(
        "Returning {} matches from {} candidates",
        matches.len(),
        total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches,
        total_candidates,
    })
}

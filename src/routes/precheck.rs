use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, PrecheckMessageRequest, StartPrecheckRequest, StartPrecheckResponse};
use crate::precheck::PrecheckError;
use crate::routes::matches::AppState;

/// Configure precheck routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/precheck/start", web::post().to(start_precheck))
        .route("/precheck/message", web::post().to(precheck_message))
        .route("/precheck/session/{session_id}", web::get().to(get_precheck_session));
}

/// Open a new precheck session and return the opening prompt
///
/// POST /api/v1/precheck/start
async fn start_precheck(
    state: web::Data<AppState>,
    req: web::Json<StartPrecheckRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let session_id = state.precheck.create_session(&req.user_id, &req.pet_id).await;

    // Drive the INIT turn so the caller gets the greeting straight away.
    match state.precheck.process_message(&session_id, "").await {
        Ok(reply) => HttpResponse::Ok().json(StartPrecheckResponse {
            session_id,
            state: reply.state,
            response: reply.response,
        }),
        Err(e) => {
            tracing::error!("Failed to start precheck session: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to start session".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Process one user message in an existing session
///
/// POST /api/v1/precheck/message
async fn precheck_message(
    state: web::Data<AppState>,
    req: web::Json<PrecheckMessageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .precheck
        .process_message(&req.session_id, &req.message)
        .await
    {
        Ok(reply) => HttpResponse::Ok().json(reply),
        Err(e @ PrecheckError::SessionNotFound(_)) => {
            HttpResponse::NotFound().json(ErrorResponse {
                error: "Session not found".to_string(),
                message: e.to_string(),
                status_code: 404,
            })
        }
    }
}

/// Read a session snapshot
///
/// GET /api/v1/precheck/session/{session_id}
async fn get_precheck_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let session_id = path.into_inner();

    match state.precheck.get_session(&session_id).await {
        Some(session) => HttpResponse::Ok().json(session),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: "Session not found".to_string(),
            message: format!("No precheck session with id {session_id}"),
            status_code: 404,
        }),
    }
}

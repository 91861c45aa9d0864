use serde::{Deserialize, Serialize};

use crate::models::domain::MatchResult;
use crate::precheck::PrecheckState;

/// Response for the find-matches endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Response when a precheck session is opened.
#[derive(Debug, Clone, Serialize)]
pub struct StartPrecheckResponse {
    pub session_id: String,
    pub state: PrecheckState,
    pub response: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

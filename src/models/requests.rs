use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{AdopterProfile, PetCandidate};

/// Request to rank candidates for an adopter.
///
/// The caller supplies both sides; the service performs no storage lookups.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    pub adopter: AdopterProfile,
    #[validate(length(min = 1))]
    pub candidates: Vec<PetCandidate>,
    #[serde(default = "default_top_k", alias = "topK")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

/// Request to open a precheck session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartPrecheckRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "petId")]
    pub pet_id: String,
}

/// One user turn in an existing precheck session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PrecheckMessageRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub message: String,
}

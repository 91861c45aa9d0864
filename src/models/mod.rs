// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AdopterProfile, BudgetLevel, ExperienceLevel, FamilyStatus, Level, LivingSpace,
    MatchDimension, MatchResult, PetAgePreference, PetCandidate, ScoringWeights, SheddingLevel,
    SizeCategory, Trainability,
};
pub use requests::{FindMatchesRequest, PrecheckMessageRequest, StartPrecheckRequest};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, StartPrecheckResponse};

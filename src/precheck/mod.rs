// Precheck subsystem exports
pub mod engine;
pub mod facts;
pub mod risks;
pub mod session;
pub mod store;

pub use engine::{risk_score, PrecheckEngine, PrecheckError, PrecheckReply};
pub use facts::Facts;
pub use risks::{catalog, evaluate, RiskDefinition, Severity};
pub use session::{
    ChatEntry, ChatRole, ClarificationGrade, ClarifiedRisk, IdentifiedRisk, PrecheckResult,
    PrecheckSession, PrecheckState, Recommendation,
};
pub use store::SessionStore;

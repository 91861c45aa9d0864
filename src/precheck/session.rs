use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::precheck::facts::Facts;
use crate::precheck::risks::{RiskDefinition, Severity};

/// Dialogue states, in fixed forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrecheckState {
    #[default]
    Init,
    BasicInfo,
    HousingCheck,
    IncomeCheck,
    TimeCommitment,
    ExperienceCheck,
    FamilyCheck,
    MotivationCheck,
    PreparationCheck,
    RiskClarification,
    Summary,
    Complete,
}

impl PrecheckState {
    /// The fixed transition graph. Only RISK_CLARIFICATION may repeat; no
    /// state is ever revisited.
    pub fn allowed_transitions(&self) -> &'static [PrecheckState] {
        use PrecheckState::*;
        match self {
            Init => &[BasicInfo],
            BasicInfo => &[HousingCheck],
            HousingCheck => &[IncomeCheck],
            IncomeCheck => &[TimeCommitment],
            TimeCommitment => &[ExperienceCheck],
            ExperienceCheck => &[FamilyCheck],
            FamilyCheck => &[MotivationCheck],
            MotivationCheck => &[PreparationCheck],
            PreparationCheck => &[RiskClarification, Summary],
            RiskClarification => &[RiskClarification, Summary],
            Summary => &[Complete],
            Complete => &[],
        }
    }

    pub fn can_transition_to(&self, target: PrecheckState) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PrecheckState::Complete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrecheckState::Init => "INIT",
            PrecheckState::BasicInfo => "BASIC_INFO",
            PrecheckState::HousingCheck => "HOUSING_CHECK",
            PrecheckState::IncomeCheck => "INCOME_CHECK",
            PrecheckState::TimeCommitment => "TIME_COMMITMENT",
            PrecheckState::ExperienceCheck => "EXPERIENCE_CHECK",
            PrecheckState::FamilyCheck => "FAMILY_CHECK",
            PrecheckState::MotivationCheck => "MOTIVATION_CHECK",
            PrecheckState::PreparationCheck => "PREPARATION_CHECK",
            PrecheckState::RiskClarification => "RISK_CLARIFICATION",
            PrecheckState::Summary => "SUMMARY",
            PrecheckState::Complete => "COMPLETE",
        }
    }
}

impl fmt::Display for PrecheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the precheck dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// How well a clarification answered its risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClarificationGrade {
    Resolved,
    Partial,
    Unresolved,
}

impl ClarificationGrade {
    /// Strict parse with a conservative fallback: anything unrecognized
    /// counts as unresolved. "unresolved" is checked first since it
    /// contains "resolved".
    pub fn parse_or_default(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("unresolved") {
            ClarificationGrade::Unresolved
        } else if lower.contains("partial") {
            ClarificationGrade::Partial
        } else if lower.contains("resolved") {
            ClarificationGrade::Resolved
        } else {
            ClarificationGrade::Unresolved
        }
    }
}

/// A risk flagged during the dialogue, pending clarification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifiedRisk {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
}

impl From<&'static RiskDefinition> for IdentifiedRisk {
    fn from(def: &'static RiskDefinition) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
            severity: def.severity,
        }
    }
}

/// A risk the applicant has responded to, with its graded resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarifiedRisk {
    pub risk_id: String,
    pub clarification: String,
    pub grade: ClarificationGrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Approve,
    Review,
    Reject,
}

/// Final outcome stored on a completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecheckResult {
    pub score: f64,
    pub recommendation: Recommendation,
    pub risks: Vec<ClarifiedRisk>,
    pub data: Facts,
}

/// One in-flight precheck conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecheckSession {
    pub session_id: String,
    pub user_id: String,
    pub pet_id: String,
    pub state: PrecheckState,
    pub collected_data: Facts,
    pub identified_risks: Vec<IdentifiedRisk>,
    pub clarified_risks: Vec<ClarifiedRisk>,
    pub chat_history: Vec<ChatEntry>,
    pub turn_count: u32,
    pub is_complete: bool,
    pub result: Option<PrecheckResult>,
}

impl PrecheckSession {
    pub fn new(session_id: String, user_id: String, pet_id: String) -> Self {
        Self {
            session_id,
            user_id,
            pet_id,
            state: PrecheckState::Init,
            collected_data: Facts::new(),
            identified_risks: Vec::new(),
            clarified_risks: Vec::new(),
            chat_history: Vec::new(),
            turn_count: 0,
            is_complete: false,
            result: None,
        }
    }

    /// Advance along the fixed transition graph.
    pub fn advance(&mut self, next: PrecheckState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal precheck transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
    }

    pub fn push_user(&mut self, text: &str) {
        self.chat_history.push(ChatEntry {
            role: ChatRole::User,
            text: text.to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.chat_history.push(ChatEntry {
            role: ChatRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    /// Latest assistant prompt, empty before the first reply.
    pub fn last_response(&self) -> &str {
        self.chat_history
            .iter()
            .rev()
            .find(|entry| entry.role == ChatRole::Assistant)
            .map(|entry| entry.text.as_str())
            .unwrap_or("")
    }

    /// Risk ids already flagged, whether pending or clarified.
    pub fn seen_risk_ids(&self) -> Vec<String> {
        self.identified_risks
            .iter()
            .map(|r| r.id.clone())
            .chain(self.clarified_risks.iter().map(|r| r.risk_id.clone()))
            .collect()
    }
}

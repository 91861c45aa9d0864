use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::precheck::facts::Facts;
use crate::precheck::risks;
use crate::precheck::session::{
    ClarificationGrade, ClarifiedRisk, IdentifiedRisk, PrecheckResult, PrecheckSession,
    PrecheckState, Recommendation,
};
use crate::precheck::store::SessionStore;
use crate::providers::{GenerationClient, PromptMessage};

/// Errors surfaced by the precheck engine.
#[derive(Debug, Error)]
pub enum PrecheckError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

/// One turn of output from `process_message`.
#[derive(Debug, Clone, Serialize)]
pub struct PrecheckReply {
    pub response: String,
    pub state: PrecheckState,
    pub is_complete: bool,
    pub identified_risks: Vec<IdentifiedRisk>,
    pub collected_data: Facts,
    pub turn_count: u32,
}

/// Fixed risk-id groupings behind the summary check marks. A new catalog
/// entry must be added to a group here or it will not appear in the
/// category coverage.
const CATEGORY_GROUPS: &[(&str, &[&str])] = &[
    ("Housing", &["R003", "R004", "R005"]),
    ("Finances", &["R001", "R002"]),
    ("Time", &["R006", "R007", "R008"]),
    ("Experience", &["R009", "R010"]),
];

/// Multi-turn pre-screening engine.
///
/// Owns the session store; all session mutation happens through
/// `process_message` under the per-session lock.
pub struct PrecheckEngine {
    store: SessionStore,
    llm: Arc<GenerationClient>,
}

impl PrecheckEngine {
    pub fn new(store: SessionStore, llm: Arc<GenerationClient>) -> Self {
        Self { store, llm }
    }

    /// Allocate a fresh session in INIT and return its id.
    pub async fn create_session(&self, user_id: &str, pet_id: &str) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = PrecheckSession::new(
            session_id.clone(),
            user_id.to_string(),
            pet_id.to_string(),
        );
        self.store.put(session).await;

        tracing::debug!("Created precheck session {} for user {}", session_id, user_id);
        session_id
    }

    /// Read-only snapshot of a session.
    pub async fn get_session(&self, session_id: &str) -> Option<PrecheckSession> {
        match self.store.get(session_id).await {
            Some(entry) => Some(entry.lock().await.clone()),
            None => None,
        }
    }

    /// Process one user message and produce the next prompt.
    pub async fn process_message(
        &self,
        session_id: &str,
        user_message: &str,
    ) -> Result<PrecheckReply, PrecheckError> {
        let entry = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| PrecheckError::SessionNotFound(session_id.to_string()))?;

        let mut session = entry.lock().await;
        session.push_user(user_message);
        session.turn_count += 1;

        match session.state {
            PrecheckState::Init => self.handle_init(&mut session),
            PrecheckState::BasicInfo => self.handle_basic_info(&mut session, user_message).await,
            PrecheckState::HousingCheck => self.handle_housing_check(&mut session, user_message),
            PrecheckState::IncomeCheck => self.handle_income_check(&mut session, user_message),
            PrecheckState::TimeCommitment => {
                self.handle_time_commitment(&mut session, user_message)
            }
            PrecheckState::ExperienceCheck => {
                self.handle_experience_check(&mut session, user_message)
            }
            PrecheckState::FamilyCheck => self.handle_family_check(&mut session, user_message),
            PrecheckState::MotivationCheck => {
                self.handle_motivation_check(&mut session, user_message)
            }
            PrecheckState::PreparationCheck => {
                self.handle_preparation_check(&mut session, user_message)
            }
            PrecheckState::RiskClarification => {
                self.handle_risk_clarification(&mut session, user_message)
                    .await
            }
            PrecheckState::Summary => self.handle_summary(&mut session),
            PrecheckState::Complete => {
                session.push_assistant("This pre-screening is already complete. Thank you!");
            }
        }

        Ok(PrecheckReply {
            response: session.last_response().to_string(),
            state: session.state,
            is_complete: session.is_complete,
            identified_risks: session.identified_risks.clone(),
            collected_data: session.collected_data.clone(),
            turn_count: session.turn_count,
        })
    }

    fn handle_init(&self, session: &mut PrecheckSession) {
        session.push_assistant(
            "Hello! I'm the PawPal adoption pre-screening assistant.\n\n\
             Before you submit a formal application, I'd like to chat for a few \
             minutes about your situation. It helps your application go through \
             faster, and helps you confirm you're ready to welcome a new family \
             member.\n\nLet's start: what is your current occupation and work \
             situation?",
        );
        session.advance(PrecheckState::BasicInfo);
    }

    async fn handle_basic_info(&self, session: &mut PrecheckSession, message: &str) {
        session.collected_data.set("occupation", message);

        let prompt = format!(
            "Given the description '{message}', classify the income stability \
             as exactly one word: stable, unstable, or student."
        );
        let reply = self
            .llm
            .chat_completion(&[PromptMessage::user(prompt)], 0.3, None)
            .await;
        session
            .collected_data
            .set("income_stability", parse_income_stability(&reply));

        session.push_assistant(
            "Thanks. Next, your housing: do you rent or own your home? Roughly \
             how big is it?",
        );
        session.advance(PrecheckState::HousingCheck);
    }

    fn handle_housing_check(&self, session: &mut PrecheckSession, message: &str) {
        let lower = message.to_lowercase();

        if !session.collected_data.contains_key("is_renting") {
            session.collected_data.set("housing_raw", message);

            let renting = (lower.contains("rent") && !lower.contains("parent"))
                || lower.contains("lease")
                || lower.contains("landlord");
            session.collected_data.set("is_renting", renting);

            if renting {
                // Stay in HOUSING_CHECK for the landlord follow-up.
                session.push_assistant(
                    "Got it, you're renting. One important point: does your \
                     landlord allow pets? Do you have that in writing?",
                );
                return;
            }

            session.push_assistant(budget_question());
            session.advance(PrecheckState::IncomeCheck);
            return;
        }

        session
            .collected_data
            .set("landlord_allows_pets", is_affirmative(&lower));
        session.push_assistant(budget_question());
        session.advance(PrecheckState::IncomeCheck);
    }

    fn handle_income_check(&self, session: &mut PrecheckSession, message: &str) {
        if let Some(budget) = first_number(message) {
            session.collected_data.set("monthly_budget", budget);
            let level = if budget > 1500.0 {
                "high"
            } else if budget > 500.0 {
                "medium"
            } else {
                "low"
            };
            session.collected_data.set("budget_level", level);
        }

        session.push_assistant(
            "Understood. About time: how many hours a day could you spend with \
             a pet? Does your work involve much travel?",
        );
        session.advance(PrecheckState::TimeCommitment);
    }

    fn handle_time_commitment(&self, session: &mut PrecheckSession, message: &str) {
        let lower = message.to_lowercase();
        let awaiting_care_plan = session.collected_data.str_of("work_schedule")
            == Some("frequent_travel")
            && !session.collected_data.contains_key("travel_care_plan");

        if awaiting_care_plan {
            session
                .collected_data
                .set("travel_care_plan", is_affirmative(&lower));
            session.push_assistant(experience_question());
            session.advance(PrecheckState::ExperienceCheck);
            return;
        }

        if let Some(hours) = first_number(message) {
            session.collected_data.set("daily_time_available", hours);
        }

        if lower.contains("travel") || lower.contains("business trip") {
            session.collected_data.set("work_schedule", "frequent_travel");
            // Stay in TIME_COMMITMENT for the care-plan follow-up.
            session.push_assistant(
                "I see. When you travel, do you have a reliable care \
                 arrangement, like family, friends or boarding?",
            );
            return;
        }

        session.collected_data.set("work_schedule", "regular");
        session.push_assistant(experience_question());
        session.advance(PrecheckState::ExperienceCheck);
    }

    fn handle_experience_check(&self, session: &mut PrecheckSession, message: &str) {
        let lower = message.to_lowercase();

        let level = if lower.trim() == "no"
            || ["never", "first time", "no experience", "haven't had"]
                .iter()
                .any(|w| lower.contains(w))
        {
            "none"
        } else if ["once", "a little", "as a kid", "childhood", "one "]
            .iter()
            .any(|w| lower.contains(w))
        {
            "beginner"
        } else {
            "experienced"
        };
        session.collected_data.set("experience_level", level);

        session.push_assistant(
            "Thanks. Your household: do you live alone, with a partner or \
             family? Any children or elderly family at home?",
        );
        session.advance(PrecheckState::FamilyCheck);
    }

    fn handle_family_check(&self, session: &mut PrecheckSession, message: &str) {
        let lower = message.to_lowercase();

        let status = if ["kid", "child", "son", "daughter"]
            .iter()
            .any(|w| lower.contains(w))
        {
            "with_kids_young"
        } else if ["elder", "parents", "grandm", "grandf"]
            .iter()
            .any(|w| lower.contains(w))
        {
            "with_elderly"
        } else if ["partner", "wife", "husband", "couple", "boyfriend", "girlfriend"]
            .iter()
            .any(|w| lower.contains(w))
        {
            "couple"
        } else {
            "single"
        };
        session.collected_data.set("family_status", status);

        session.push_assistant(
            "Alright. An important question: why do you want to adopt this pet? \
             What drew you to them?",
        );
        session.advance(PrecheckState::MotivationCheck);
    }

    fn handle_motivation_check(&self, session: &mut PrecheckSession, message: &str) {
        session.collected_data.set("adoption_reason", message);

        session.push_assistant(
            "Understood. Last few questions: what preparations have you made? \
             For example researching the breed, buying supplies, or planning \
             for emergencies.",
        );
        session.advance(PrecheckState::PreparationCheck);
    }

    fn handle_preparation_check(&self, session: &mut PrecheckSession, message: &str) {
        let lower = message.to_lowercase();
        session.collected_data.set("preparation", message);

        let supplies = ["supplies", "bought", "food", "crate", "bed", "leash", "litter"]
            .iter()
            .any(|w| lower.contains(w));
        let research = ["research", "read", "breed", "learn", "vet"]
            .iter()
            .any(|w| lower.contains(w));
        let contingency = ["plan", "backup", "emergency"].iter().any(|w| lower.contains(w));

        session.collected_data.set("has_prepared_supplies", supplies);
        session.collected_data.set("has_researched_breed", research);
        session.collected_data.set("has_contingency_plan", contingency);

        self.check_risks(session);

        if let Some(risk) = session.identified_risks.first() {
            let description = risk.description.clone();
            session.push_assistant(format!(
                "I noticed something we should look at together: {description}\n\n\
                 Could you tell me more about your situation?"
            ));
            session.advance(PrecheckState::RiskClarification);
            return;
        }

        session.advance(PrecheckState::Summary);
        self.handle_summary(session);
    }

    async fn handle_risk_clarification(&self, session: &mut PrecheckSession, message: &str) {
        if !session.identified_risks.is_empty() {
            let risk = session.identified_risks.remove(0);

            let prompt = format!(
                "Risk: {}\nApplicant explanation: {}\n\nAssess whether the \
                 explanation resolves the risk. Reply with exactly one word: \
                 resolved, partial, or unresolved.",
                risk.description, message
            );
            let reply = self
                .llm
                .chat_completion(&[PromptMessage::user(prompt)], 0.3, None)
                .await;
            let grade = ClarificationGrade::parse_or_default(&reply);

            session.clarified_risks.push(ClarifiedRisk {
                risk_id: risk.id,
                clarification: message.to_string(),
                grade,
            });
        }

        self.check_risks(session);

        if let Some(next) = session.identified_risks.first() {
            let description = next.description.clone();
            session.push_assistant(format!(
                "One more thing I'd like to confirm: {description}"
            ));
            session.advance(PrecheckState::RiskClarification);
            return;
        }

        session.advance(PrecheckState::Summary);
        self.handle_summary(session);
    }

    fn handle_summary(&self, session: &mut PrecheckSession) {
        let score = risk_score(session);
        let recommendation = if score >= 80.0 {
            Recommendation::Approve
        } else if score >= 60.0 {
            Recommendation::Review
        } else {
            Recommendation::Reject
        };

        let conclusion = match recommendation {
            Recommendation::Approve => {
                "Based on our conversation, you look well prepared to adopt this pet!"
            }
            Recommendation::Review => {
                "Your overall situation looks good, with a few areas that could improve."
            }
            Recommendation::Reject => {
                "It may be a little early to adopt this pet; some preparation would help first."
            }
        };

        let outstanding = outstanding_risk_ids(session);
        let mut lines = vec![conclusion.to_string(), String::new(), "Review summary:".to_string()];
        for (label, ids) in CATEGORY_GROUPS {
            let clear = !outstanding.iter().any(|id| ids.contains(&id.as_str()));
            lines.push(format!("- {}: {}", label, if clear { "ok" } else { "needs attention" }));
        }
        lines.push(String::new());
        lines.push(
            match recommendation {
                Recommendation::Approve => {
                    "Next step: you can go ahead and submit the formal application."
                }
                Recommendation::Review => "Next step: a coordinator will review your answers.",
                Recommendation::Reject => {
                    "Next step: improve the flagged areas, then apply again."
                }
            }
            .to_string(),
        );
        lines.push(String::new());
        lines.push("Thank you for your patience!".to_string());

        session.push_assistant(lines.join("\n"));
        session.is_complete = true;
        session.advance(PrecheckState::Complete);

        session.result = Some(PrecheckResult {
            score,
            recommendation,
            risks: session.clarified_risks.clone(),
            data: session.collected_data.clone(),
        });

        tracing::info!(
            "Precheck session {} complete: score {:.0}, {:?}",
            session.session_id,
            score,
            recommendation
        );
    }

    /// Evaluate the catalog and append any newly triggered risks.
    fn check_risks(&self, session: &mut PrecheckSession) {
        let seen = session.seen_risk_ids();
        for definition in risks::evaluate(&session.collected_data, &seen) {
            session.identified_risks.push(IdentifiedRisk::from(definition));
        }
    }
}

/// Risk score on the 0-100 scale, higher is better.
///
/// Every flagged risk costs its severity penalty unless its clarification
/// was graded resolved; each clarified risk also earns a flat 5-point
/// credit for engaging with the question.
pub fn risk_score(session: &PrecheckSession) -> f64 {
    let mut score = 100.0;

    for risk in &session.identified_risks {
        score -= risk.severity.penalty();
    }
    for clarified in &session.clarified_risks {
        if clarified.grade != ClarificationGrade::Resolved {
            if let Some(definition) = risks::find(&clarified.risk_id) {
                score -= definition.severity.penalty();
            }
        }
    }

    score += 5.0 * session.clarified_risks.len() as f64;
    score.clamp(0.0, 100.0)
}

/// Ids of risks whose penalty still stands.
fn outstanding_risk_ids(session: &PrecheckSession) -> Vec<String> {
    session
        .identified_risks
        .iter()
        .map(|r| r.id.clone())
        .chain(
            session
                .clarified_risks
                .iter()
                .filter(|r| r.grade != ClarificationGrade::Resolved)
                .map(|r| r.risk_id.clone()),
        )
        .collect()
}

fn budget_question() -> &'static str {
    "Good. Now about finances: roughly how much can you budget for the pet \
     each month, including food, vet care and supplies?"
}

fn experience_question() -> &'static str {
    "Good. About experience: have you had pets before? If so, how did it go?"
}

fn parse_income_stability(reply: &str) -> &'static str {
    let lower = reply.to_lowercase();
    if lower.contains("unstable") {
        "unstable"
    } else if lower.contains("student") {
        "student"
    } else {
        // "stable" and anything unparseable both land on the safe default.
        "stable"
    }
}

fn first_number(text: &str) -> Option<f64> {
    let mut digits = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if !digits.is_empty() {
            break;
        }
    }
    digits.parse().ok()
}

fn is_affirmative(lower: &str) -> bool {
    let negative = lower.trim() == "no"
        || ["not", "n't", "never", "no,"].iter().any(|w| lower.contains(w));
    let positive = [
        "yes",
        "allow",
        "agreed",
        "permission",
        "in writing",
        "confirmed",
        "of course",
        "sure",
    ]
    .iter()
    .any(|w| lower.contains(w));

    positive && !negative
}

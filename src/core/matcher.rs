use std::cmp::Ordering;
use std::sync::Arc;

use crate::core::constraints::check_hard_constraints;
use crate::core::history::historical_score;
use crate::core::preference::score_soft_preferences;
use crate::models::{AdopterProfile, MatchResult, PetCandidate, ScoringWeights};
use crate::providers::EmbeddingClient;

/// Hybrid matching orchestrator.
///
/// Blends hard eligibility rules, semantic soft preferences and the
/// historical outcome prior into one explainable score per candidate.
#[derive(Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    embeddings: Arc<EmbeddingClient>,
}

impl Matcher {
    pub fn new(embeddings: Arc<EmbeddingClient>, weights: ScoringWeights) -> Self {
        Self {
            weights,
            embeddings,
        }
    }

    pub fn with_default_weights(embeddings: Arc<EmbeddingClient>) -> Self {
        Self::new(embeddings, ScoringWeights::default())
    }

    /// Score one (adopter, pet) pair.
    ///
    /// A pair failing any hard rule is capped at hard_score x 0.3, at most
    /// 30 points, regardless of its soft or historical quality.
    pub async fn calculate_match(&self, adopter: &AdopterProfile, pet: &PetCandidate) -> MatchResult {
        let hard = check_hard_constraints(adopter, pet);
        let (soft_score, dimensions) =
            score_soft_preferences(&self.embeddings, adopter, pet).await;
        let (hist_score, hist_reason) = historical_score(pet);

        let overall = if hard.passed {
            hard.score * self.weights.hard_constraints
                + soft_score * self.weights.soft_preferences
                + hist_score * self.weights.historical
        } else {
            hard.score * 0.3
        };

        let mut match_reasons: Vec<String> = hard.passed_rules.iter().take(3).cloned().collect();
        if soft_score >= 80.0 {
            match_reasons.push("Temperament and activity are a strong fit".to_string());
        } else if soft_score >= 60.0 {
            match_reasons.push("Overall preferences align well".to_string());
        }
        if hist_score >= 70.0 {
            match_reasons.push(hist_reason);
        }

        let mut concerns = hard.failed_rules.clone();
        if soft_score < 60.0 {
            concerns.push(
                "Overall preference alignment is low; get to know this pet before committing"
                    .to_string(),
            );
        }

        let mut recommendations = Vec::new();
        if !hard.passed {
            recommendations
                .push("Address the failed requirements before applying".to_string());
        }
        if soft_score < 70.0 {
            recommendations
                .push("Arrange a meet-and-greet to confirm the fit in person".to_string());
        }
        if !pet.special_needs.is_empty() {
            recommendations.push(format!(
                "Be ready for special needs: {}",
                pet.special_needs.join(", ")
            ));
        }

        MatchResult {
            pet_id: pet.id.clone(),
            pet_name: pet.name.clone(),
            overall_score: round1(overall),
            hard_constraint_score: round1(hard.score),
            soft_preference_score: round1(soft_score),
            historical_score: round1(hist_score),
            dimensions,
            match_reasons,
            concerns,
            recommendations,
            passed_hard_constraints: hard.passed,
            failed_constraints: hard.failed_rules,
        }
    }

    /// Score every candidate concurrently, rank, and keep the top k.
    ///
    /// Any candidate passing the hard rules ranks strictly above any failing
    /// one; ties within a group break by descending overall score.
    pub async fn find_best_matches(
        &self,
        adopter: &AdopterProfile,
        candidates: &[PetCandidate],
        top_k: usize,
    ) -> Vec<MatchResult> {
        let mut results = futures::future::join_all(
            candidates.iter().map(|pet| self.calculate_match(adopter, pet)),
        )
        .await;

        results.sort_by(|a, b| {
            b.passed_hard_constraints
                .cmp(&a.passed_hard_constraints)
                .then_with(|| {
                    b.overall_score
                        .partial_cmp(&a.overall_score)
                        .unwrap_or(Ordering::Equal)
                })
        });

        results.truncate(top_k);
        results
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

use std::collections::HashSet;

use crate::core::describe::{adopter_profile_to_text, pet_profile_to_text};
use crate::core::similarity::{cosine_similarity, similarity_to_score};
use crate::models::{AdopterProfile, MatchDimension, PetCandidate};
use crate::providers::EmbeddingClient;

/// Score soft preferences as a weighted set of dimensions.
///
/// Always produces a score: provider trouble is absorbed inside the
/// embedding client, so the returned shape never changes.
pub async fn score_soft_preferences(
    embeddings: &EmbeddingClient,
    adopter: &AdopterProfile,
    pet: &PetCandidate,
) -> (f64, Vec<MatchDimension>) {
    let mut dimensions = Vec::new();

    // 1. Overall profile similarity from the templated descriptions
    let adopter_text = adopter_profile_to_text(adopter);
    let pet_text = pet_profile_to_text(pet);

    let vectors = embeddings
        .embed_batch(&[adopter_text.clone(), pet_text])
        .await;
    let similarity = cosine_similarity(&vectors[0], &vectors[1]);

    dimensions.push(MatchDimension {
        name: "overall profile match".to_string(),
        score: similarity_to_score(similarity),
        weight: 0.5,
        reason: format!(
            "Semantic similarity of a {}-character profile description",
            adopter_text.len()
        ),
    });

    // 2. Temperament overlap
    dimensions.push(MatchDimension {
        name: "temperament match".to_string(),
        score: match_temperament(&adopter.preferred_temperament, &pet.temperament),
        weight: 0.3,
        reason: "Overlap between preferred and actual temperament traits".to_string(),
    });

    // 3. Activity level distance
    dimensions.push(MatchDimension {
        name: "activity match".to_string(),
        score: match_activity(adopter.activity_level.ordinal(), pet.energy_level.ordinal()),
        weight: 0.2,
        reason: "Distance between preferred activity and the pet's energy level".to_string(),
    });

    let total_weight: f64 = dimensions.iter().map(|d| d.weight).sum();
    let weighted: f64 = dimensions.iter().map(|d| d.score * d.weight).sum();

    (weighted / total_weight, dimensions)
}

/// Jaccard overlap of temperament tags, on the 0-100 scale.
///
/// No expressed preference defaults to 80; a candidate with no tags to
/// compare against defaults to 50.
fn match_temperament(preferred: &[String], actual: &[String]) -> f64 {
    if preferred.is_empty() {
        return 80.0;
    }
    if actual.is_empty() {
        return 50.0;
    }

    let preferred: HashSet<&str> = preferred.iter().map(String::as_str).collect();
    let actual: HashSet<&str> = actual.iter().map(String::as_str).collect();

    let matched = preferred.intersection(&actual).count();
    let total = preferred.union(&actual).count();

    matched as f64 / total as f64 * 100.0
}

/// Ordinal distance over the low/medium/high scale.
fn match_activity(adopter_ordinal: i32, pet_ordinal: i32) -> f64 {
    match (adopter_ordinal - pet_ordinal).abs() {
        0 => 100.0,
        1 => 70.0,
        _ => 40.0,
    }
}

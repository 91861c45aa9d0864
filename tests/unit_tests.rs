// Unit tests for PawPal Algo

use pawpal_algo::core::{
    adopter_profile_to_text, check_hard_constraints, cosine_similarity, historical_score,
    pet_profile_to_text, similarity_to_score,
};
use pawpal_algo::models::{
    AdopterProfile, ExperienceLevel, Level, LivingSpace, PetCandidate, SizeCategory, Trainability,
};
use pawpal_algo::precheck::{catalog, evaluate, Facts};

fn test_pet() -> PetCandidate {
    serde_json::from_str(r#"{"id": "p1", "name": "Rex", "breed": "Beagle"}"#).unwrap()
}

#[test]
fn test_scenario_small_apartment_novice_vs_large_difficult_pet() {
    // Space and experience rules both fail, so the pair is disqualified.
    let adopter = AdopterProfile {
        living_space: LivingSpace::SmallApartment,
        experience_level: ExperienceLevel::None,
        ..Default::default()
    };
    let mut pet = test_pet();
    pet.size_category = SizeCategory::Large;
    pet.trainability = Trainability::Difficult;

    let check = check_hard_constraints(&adopter, &pet);
    assert!(!check.passed);
    assert_eq!(check.failed_rules.len(), 2);
    assert!(check.score < 100.0);
}

#[test]
fn test_constraint_check_is_deterministic() {
    let adopter = AdopterProfile::default();
    let pet = test_pet();

    let a = check_hard_constraints(&adopter, &pet);
    let b = check_hard_constraints(&adopter, &pet);
    assert_eq!(a.passed, b.passed);
    assert_eq!(a.score, b.score);
    assert_eq!(a.passed_rules, b.passed_rules);
}

#[test]
fn test_profile_text_templates_are_stable() {
    let adopter = AdopterProfile {
        activity_level: Level::High,
        preferred_temperament: vec!["playful".to_string()],
        ..Default::default()
    };
    let pet = test_pet();

    assert_eq!(adopter_profile_to_text(&adopter), adopter_profile_to_text(&adopter));
    assert_eq!(pet_profile_to_text(&pet), pet_profile_to_text(&pet));
}

#[test]
fn test_historical_prior_cold_start() {
    let pet = test_pet();
    let (score, reason) = historical_score(&pet);
    assert_eq!(score, 50.0);
    assert!(reason.contains("Cold start"));

    let mut seasoned = test_pet();
    seasoned.success_rate = Some(0.9);
    let (score, reason) = historical_score(&seasoned);
    assert_eq!(score, 90.0);
    assert!(reason.contains("90.0%"));
}

#[test]
fn test_cosine_similarity_bounds() {
    let a = vec![0.3f32, -0.4, 0.5];
    let b = vec![-0.1f32, 0.9, 0.2];
    let sim = cosine_similarity(&a, &b);
    assert!((-1.0..=1.0).contains(&sim));

    let score = similarity_to_score(sim);
    assert!((0.0..=100.0).contains(&score));
}

#[test]
fn test_risk_catalog_evaluates_empty_facts_without_raising() {
    let triggered = evaluate(&Facts::new(), &[]);
    // Sparse facts trip a few falsy-default predicates; the call itself
    // must simply return.
    assert!(triggered.len() <= catalog().len());
}

#[test]
fn test_renting_without_permission_risk() {
    let mut facts = Facts::new();
    facts.set("is_renting", true);
    facts.set("landlord_allows_pets", false);

    let triggered = evaluate(&facts, &[]);
    assert!(triggered
        .iter()
        .any(|d| d.name == "Renting without permission"));
}

#[test]
fn test_catalog_severity_distribution() {
    // The table is fixed at process start; a sanity pass over its shape.
    assert_eq!(catalog().len(), 20);
    for def in catalog() {
        assert!(def.id.starts_with('R'));
        assert!(!def.name.is_empty());
        assert!(!def.description.is_empty());
    }
}

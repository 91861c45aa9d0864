use crate::models::{
    AdopterProfile, ExperienceLevel, FamilyStatus, Level, LivingSpace, PetCandidate,
    SheddingLevel, SizeCategory, Trainability,
};

/// Result of the hard-constraint pass for one (adopter, pet) pair.
///
/// A single failing rule disqualifies the pair regardless of how many other
/// rules pass.
#[derive(Debug, Clone)]
pub struct HardConstraintCheck {
    pub passed: bool,
    pub score: f64,
    pub passed_rules: Vec<String>,
    pub failed_rules: Vec<String>,
}

/// Pet sizes an adopter's living space can accommodate.
fn allowed_sizes(living: LivingSpace) -> &'static [SizeCategory] {
    use SizeCategory::*;
    match living {
        LivingSpace::SmallApartment => &[Tiny, Small],
        LivingSpace::MediumApartment => &[Tiny, Small, Medium],
        LivingSpace::LargeApartment => &[Tiny, Small, Medium, Large],
        LivingSpace::HouseWithYard | LivingSpace::Rural => {
            &[Tiny, Small, Medium, Large, Xlarge]
        }
    }
}

/// Training difficulty an adopter's experience level can handle.
fn allowed_trainability(experience: ExperienceLevel) -> &'static [Trainability] {
    use Trainability::*;
    match experience {
        ExperienceLevel::None => &[Easy],
        ExperienceLevel::Beginner => &[Easy, Moderate],
        ExperienceLevel::Intermediate | ExperienceLevel::Experienced => {
            &[Easy, Moderate, Difficult]
        }
    }
}

/// Daily hours a pet's exercise needs demand, as (min, max).
fn exercise_hours(needs: Level) -> (f64, f64) {
    match needs {
        Level::Low => (0.0, 1.0),
        Level::Medium => (1.0, 3.0),
        Level::High => (2.0, 24.0),
    }
}

/// Shedding levels an adopter's tolerance accepts.
fn allowed_shedding(tolerance: SheddingLevel) -> &'static [SheddingLevel] {
    use SheddingLevel::*;
    match tolerance {
        None => &[None],
        Low => &[None, Low],
        Medium => &[None, Low, Medium],
        High => &[None, Low, Medium, High],
    }
}

/// Evaluate the seven hard eligibility rules.
///
/// Deterministic and side-effect-free; every message is human-readable and
/// accumulates into passed or failed lists.
pub fn check_hard_constraints(adopter: &AdopterProfile, pet: &PetCandidate) -> HardConstraintCheck {
    let mut passed_rules = Vec::new();
    let mut failed_rules = Vec::new();

    // 1. Living space vs pet size
    if allowed_sizes(adopter.living_space).contains(&pet.size_category) {
        passed_rules.push(format!(
            "Space fits: a {} suits a {} pet",
            adopter.living_space.as_str(),
            pet.size_category.as_str()
        ));
    } else {
        failed_rules.push(format!(
            "Space mismatch: a {} cannot accommodate a {} pet",
            adopter.living_space.as_str(),
            pet.size_category.as_str()
        ));
    }

    // 2. Experience vs training difficulty
    if allowed_trainability(adopter.experience_level).contains(&pet.trainability) {
        passed_rules.push(format!(
            "Experience fits: {} experience can handle {} training",
            adopter.experience_level.as_str(),
            pet.trainability.as_str()
        ));
    } else {
        failed_rules.push(format!(
            "Experience gap: {} experience is not enough for {} training",
            adopter.experience_level.as_str(),
            pet.trainability.as_str()
        ));
    }

    // 3. Daily time vs exercise needs
    let (min_hours, max_hours) = exercise_hours(pet.exercise_needs);
    let time = adopter.daily_time_available;
    if time < min_hours {
        failed_rules.push(format!(
            "Not enough time: this pet needs at least {min_hours} hours a day"
        ));
    } else if time <= max_hours {
        passed_rules.push(format!(
            "Time fits: {time} hours a day covers the exercise needs"
        ));
    } else {
        passed_rules.push(format!("Time is plentiful: {time} hours a day"));
    }

    // 4. Family status vs kid compatibility (only when applicable)
    if adopter.family_status == FamilyStatus::WithKidsYoung {
        if pet.good_with_kids {
            passed_rules.push("Suitable for a family with young children".to_string());
        } else {
            failed_rules.push("Not suitable for a family with young children".to_string());
        }
    }

    // 5. Shedding tolerance vs shedding level
    if allowed_shedding(adopter.shedding_tolerance).contains(&pet.shedding_level) {
        passed_rules.push("Shedding level is within tolerance".to_string());
    } else {
        failed_rules.push("Shedding level exceeds tolerance".to_string());
    }

    // 6. Noise tolerance vs energy level
    if adopter.noise_tolerance == Level::Low && pet.energy_level == Level::High {
        failed_rules.push("A high-energy pet is likely too loud".to_string());
    } else {
        passed_rules.push("Noise level is acceptable".to_string());
    }

    // 7. Renting without landlord permission (only when renting)
    if adopter.is_renting {
        if adopter.landlord_allows_pets == Some(false) {
            failed_rules.push("Landlord does not allow pets".to_string());
        } else {
            passed_rules.push("Renting conditions allow a pet".to_string());
        }
    }

    let total = passed_rules.len() + failed_rules.len();
    let score = if total == 0 {
        100.0
    } else {
        passed_rules.len() as f64 / total as f64 * 100.0
    };

    HardConstraintCheck {
        passed: failed_rules.is_empty(),
        score,
        passed_rules,
        failed_rules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet() -> PetCandidate {
        serde_json::from_str(r#"{"id": "p1", "name": "Rex"}"#).unwrap()
    }

    // A profile with enough experience for a default (moderate) pet; the
    // other fields keep their documented defaults.
    fn beginner() -> AdopterProfile {
        AdopterProfile {
            experience_level: ExperienceLevel::Beginner,
            ..Default::default()
        }
    }

    #[test]
    fn test_compatible_pair_passes_all_rules() {
        let check = check_hard_constraints(&beginner(), &pet());
        assert!(check.passed);
        assert_eq!(check.score, 100.0);
        assert!(check.failed_rules.is_empty());
    }

    #[test]
    fn test_inexperienced_adopter_fails_moderate_pet() {
        // The documented default experience is none, which only covers
        // easy-training pets.
        let check = check_hard_constraints(&AdopterProfile::default(), &pet());
        assert!(!check.passed);
        assert!(check.failed_rules.iter().any(|r| r.contains("Experience gap")));
    }

    #[test]
    fn test_small_apartment_large_pet_fails() {
        let adopter = AdopterProfile {
            living_space: LivingSpace::SmallApartment,
            ..Default::default()
        };
        let mut large = pet();
        large.size_category = SizeCategory::Large;

        let check = check_hard_constraints(&adopter, &large);
        assert!(!check.passed);
        assert!(check.failed_rules.iter().any(|r| r.contains("Space mismatch")));
    }

    #[test]
    fn test_novice_difficult_pet_fails() {
        let adopter = AdopterProfile {
            experience_level: ExperienceLevel::None,
            ..Default::default()
        };
        let mut tricky = pet();
        tricky.trainability = Trainability::Difficult;

        let check = check_hard_constraints(&adopter, &tricky);
        assert!(!check.passed);
        assert!(check.failed_rules.iter().any(|r| r.contains("Experience gap")));
    }

    #[test]
    fn test_time_below_minimum_fails() {
        let adopter = AdopterProfile {
            daily_time_available: 0.5,
            ..beginner()
        };
        let mut active = pet();
        active.exercise_needs = Level::High;

        let check = check_hard_constraints(&adopter, &active);
        assert!(!check.passed);
        assert!(check.failed_rules.iter().any(|r| r.contains("Not enough time")));
    }

    #[test]
    fn test_surplus_time_still_passes() {
        let adopter = AdopterProfile {
            daily_time_available: 6.0,
            ..beginner()
        };
        let mut calm = pet();
        calm.exercise_needs = Level::Low;

        let check = check_hard_constraints(&adopter, &calm);
        assert!(check.passed_rules.iter().any(|r| r.contains("plentiful")));
    }

    #[test]
    fn test_kid_rule_only_checked_for_young_kids() {
        let mut grumpy = pet();
        grumpy.good_with_kids = false;

        let single = check_hard_constraints(&beginner(), &grumpy);
        assert!(single.passed);

        let with_kids = AdopterProfile {
            family_status: FamilyStatus::WithKidsYoung,
            ..beginner()
        };
        let check = check_hard_constraints(&with_kids, &grumpy);
        assert!(!check.passed);
    }

    #[test]
    fn test_low_noise_tolerance_rejects_high_energy() {
        let adopter = AdopterProfile {
            noise_tolerance: Level::Low,
            ..beginner()
        };
        let mut bouncy = pet();
        bouncy.energy_level = Level::High;

        let check = check_hard_constraints(&adopter, &bouncy);
        assert!(!check.passed);
        assert!(check.failed_rules.iter().any(|r| r.contains("too loud")));
    }

    #[test]
    fn test_renting_without_permission_fails() {
        let adopter = AdopterProfile {
            is_renting: true,
            landlord_allows_pets: Some(false),
            ..beginner()
        };
        let check = check_hard_constraints(&adopter, &pet());
        assert!(!check.passed);

        // Unknown permission passes with the renting rule recorded.
        let unknown = AdopterProfile {
            is_renting: true,
            landlord_allows_pets: None,
            ..beginner()
        };
        let check = check_hard_constraints(&unknown, &pet());
        assert!(check.passed);
        assert!(check.passed_rules.iter().any(|r| r.contains("Renting")));
    }

    #[test]
    fn test_score_reflects_pass_ratio() {
        let adopter = AdopterProfile {
            living_space: LivingSpace::SmallApartment,
            ..Default::default()
        };
        let mut large = pet();
        large.size_category = SizeCategory::Large;

        let check = check_hard_constraints(&adopter, &large);
        let total = check.passed_rules.len() + check.failed_rules.len();
        let expected = check.passed_rules.len() as f64 / total as f64 * 100.0;
        assert!((check.score - expected).abs() < 1e-9);
    }
}

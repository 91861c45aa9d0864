//! Deterministic natural-language rendering of profiles and candidates.
//!
//! Identical input always yields identical text; the embedding cache keys on
//! this output.

use crate::models::{
    AdopterProfile, FamilyStatus, Level, PetAgePreference, PetCandidate, SheddingLevel,
};

/// Render an adopter profile as a short description for embedding.
pub fn adopter_profile_to_text(profile: &AdopterProfile) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("Lives in a {}", profile.living_space.as_str()));

    if profile.has_yard {
        parts.push("Has a yard".to_string());
    }

    parts.push(format!(
        "Has {} pet-care experience",
        profile.experience_level.as_str()
    ));

    let time = profile.daily_time_available;
    if time >= 4.0 {
        parts.push(format!(
            "Has {time} hours a day for a pet, plenty of time"
        ));
    } else if time >= 2.0 {
        parts.push(format!("Has {time} hours a day for a pet"));
    } else {
        parts.push(format!(
            "Has only {time} hours a day for a pet, limited time"
        ));
    }

    parts.push(
        match profile.family_status {
            FamilyStatus::Single => "Lives alone",
            FamilyStatus::Couple => "Lives with a partner",
            FamilyStatus::WithKidsYoung => "Has young children",
            FamilyStatus::WithKidsOld => "Has older children",
            FamilyStatus::WithElderly => "Lives with elderly family",
            FamilyStatus::MultiGen => "Lives in a multi-generation household",
        }
        .to_string(),
    );

    parts.push(
        match profile.activity_level {
            Level::Low => "Prefers a quiet lifestyle",
            Level::Medium => "Enjoys moderate activity",
            Level::High => "Enjoys an active lifestyle",
        }
        .to_string(),
    );

    if let Some(age) = profile.preferred_age {
        parts.push(
            match age {
                PetAgePreference::Puppy => "Prefers a very young pet",
                PetAgePreference::Young => "Prefers a young pet",
                PetAgePreference::Adult => "Prefers an adult pet",
                PetAgePreference::Senior => "Prefers a senior pet",
            }
            .to_string(),
        );
    }

    if !profile.preferred_temperament.is_empty() {
        parts.push(format!(
            "Wants a pet that is {}",
            profile.preferred_temperament.join(", ")
        ));
    }

    parts.join(". ")
}

/// Render a pet candidate as a short description for embedding.
pub fn pet_profile_to_text(pet: &PetCandidate) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !pet.breed.is_empty() {
        parts.push(pet.breed.clone());
    }

    parts.push(
        match pet.age_months {
            0..=5 => "A very young pet",
            6..=23 => "A young pet",
            24..=83 => "An adult pet",
            _ => "A senior pet",
        }
        .to_string(),
    );

    parts.push(format!("A {} pet", pet.size_category.as_str()));

    if !pet.temperament.is_empty() {
        parts.push(format!("Temperament: {}", pet.temperament.join(", ")));
    }

    parts.push(
        match pet.energy_level {
            Level::Low => "Low energy, fairly calm",
            Level::Medium => "Medium energy",
            Level::High => "High energy, needs lots of exercise",
        }
        .to_string(),
    );

    parts.push(
        match pet.shedding_level {
            SheddingLevel::None => "Does not shed",
            SheddingLevel::Low => "Sheds a little",
            SheddingLevel::Medium => "Sheds a normal amount",
            SheddingLevel::High => "Sheds a lot",
        }
        .to_string(),
    );

    if pet.good_with_kids {
        parts.push("Good with children".to_string());
    }
    if pet.good_with_dogs {
        parts.push("Gets along with other dogs".to_string());
    }
    if pet.good_with_cats {
        parts.push("Gets along with cats".to_string());
    }

    parts.join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, LivingSpace};

    #[test]
    fn test_adopter_text_is_deterministic() {
        let profile = AdopterProfile {
            living_space: LivingSpace::HouseWithYard,
            has_yard: true,
            experience_level: ExperienceLevel::Experienced,
            preferred_temperament: vec!["calm".to_string(), "friendly".to_string()],
            ..Default::default()
        };

        let a = adopter_profile_to_text(&profile);
        let b = adopter_profile_to_text(&profile);
        assert_eq!(a, b);
        assert!(a.contains("house with a yard"));
        assert!(a.contains("calm, friendly"));
    }

    #[test]
    fn test_pet_text_covers_age_buckets() {
        let mut pet: PetCandidate =
            serde_json::from_str(r#"{"id": "p1", "name": "Rex", "breed": "Beagle"}"#).unwrap();

        pet.age_months = 3;
        assert!(pet_profile_to_text(&pet).contains("very young"));
        pet.age_months = 12;
        assert!(pet_profile_to_text(&pet).contains("A young pet"));
        pet.age_months = 36;
        assert!(pet_profile_to_text(&pet).contains("adult"));
        pet.age_months = 100;
        assert!(pet_profile_to_text(&pet).contains("senior"));
    }
}

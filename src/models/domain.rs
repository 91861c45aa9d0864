use serde::{Deserialize, Serialize};

/// Living situation of an adopter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivingSpace {
    SmallApartment,
    #[default]
    MediumApartment,
    LargeApartment,
    HouseWithYard,
    Rural,
}

/// Prior pet-care experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    None,
    Beginner,
    Intermediate,
    Experienced,
}

/// Household composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyStatus {
    #[default]
    Single,
    Couple,
    WithKidsYoung,
    WithKidsOld,
    WithElderly,
    MultiGen,
}

/// Three-step ordinal scale shared by energy, activity, exercise and noise
/// attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

impl Level {
    /// Position on the low..high scale, for ordinal-distance scoring.
    pub fn ordinal(self) -> i32 {
        match self {
            Level::Low => 0,
            Level::Medium => 1,
            Level::High => 2,
        }
    }
}

impl LivingSpace {
    pub fn as_str(self) -> &'static str {
        match self {
            LivingSpace::SmallApartment => "small apartment",
            LivingSpace::MediumApartment => "medium apartment",
            LivingSpace::LargeApartment => "large apartment",
            LivingSpace::HouseWithYard => "house with a yard",
            LivingSpace::Rural => "rural home",
        }
    }
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::None => "no",
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Experienced => "extensive",
        }
    }
}

impl SizeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeCategory::Tiny => "tiny",
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
            SizeCategory::Xlarge => "extra-large",
        }
    }
}

impl Trainability {
    pub fn as_str(self) -> &'static str {
        match self {
            Trainability::Easy => "easy",
            Trainability::Moderate => "moderate",
            Trainability::Difficult => "difficult",
        }
    }
}

/// Shedding intensity, used both for a pet's coat and an adopter's tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheddingLevel {
    None,
    Low,
    #[default]
    Medium,
    High,
}

/// Pet body size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Xlarge,
}

/// How hard a pet is to train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trainability {
    Easy,
    #[default]
    Moderate,
    Difficult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    Low,
    #[default]
    Medium,
    High,
}

/// Preferred pet life stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetAgePreference {
    Puppy,
    Young,
    Adult,
    Senior,
}

/// Adopter profile supplied by the caller per request.
///
/// Every field carries a serde default so a partial profile deserializes
/// cleanly; the evaluators never see a missing field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdopterProfile {
    #[serde(default)]
    pub living_space: LivingSpace,
    #[serde(default)]
    pub has_yard: bool,
    #[serde(default)]
    pub is_renting: bool,
    /// Tri-state: unknown until the adopter confirms either way.
    #[serde(default)]
    pub landlord_allows_pets: Option<bool>,
    #[serde(default)]
    pub budget_level: BudgetLevel,
    #[serde(default = "default_daily_time")]
    pub daily_time_available: f64,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub family_status: FamilyStatus,
    #[serde(default = "default_household_size")]
    pub household_size: u32,
    #[serde(default)]
    pub activity_level: Level,
    #[serde(default)]
    pub noise_tolerance: Level,
    #[serde(default)]
    pub shedding_tolerance: SheddingLevel,
    #[serde(default)]
    pub preferred_size: Option<SizeCategory>,
    #[serde(default)]
    pub preferred_age: Option<PetAgePreference>,
    #[serde(default)]
    pub preferred_temperament: Vec<String>,
    #[serde(default)]
    pub deal_breakers: Vec<String>,
}

impl Default for AdopterProfile {
    fn default() -> Self {
        Self {
            living_space: LivingSpace::default(),
            has_yard: false,
            is_renting: false,
            landlord_allows_pets: None,
            budget_level: BudgetLevel::default(),
            daily_time_available: default_daily_time(),
            experience_level: ExperienceLevel::default(),
            family_status: FamilyStatus::default(),
            household_size: default_household_size(),
            activity_level: Level::default(),
            noise_tolerance: Level::default(),
            shedding_tolerance: SheddingLevel::default(),
            preferred_size: None,
            preferred_age: None,
            preferred_temperament: Vec::new(),
            deal_breakers: Vec::new(),
        }
    }
}

fn default_daily_time() -> f64 {
    2.0
}

fn default_household_size() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Adoptable pet supplied by the caller per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetCandidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub age_months: u32,
    #[serde(default)]
    pub size_category: SizeCategory,
    #[serde(default)]
    pub temperament: Vec<String>,
    #[serde(default)]
    pub energy_level: Level,
    #[serde(default)]
    pub trainability: Trainability,
    #[serde(default)]
    pub shedding_level: SheddingLevel,
    #[serde(default)]
    pub exercise_needs: Level,
    #[serde(default = "default_true")]
    pub good_with_kids: bool,
    #[serde(default)]
    pub good_with_dogs: bool,
    #[serde(default)]
    pub good_with_cats: bool,
    #[serde(default)]
    pub special_needs: Vec<String>,
    /// Empirical adoption success rate in [0,1]; absent means cold start.
    #[serde(default)]
    pub success_rate: Option<f64>,
}

/// One soft-preference facet of a match; insertion order is display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDimension {
    pub name: String,
    pub score: f64,
    pub weight: f64,
    pub reason: String,
}

/// Full explainable score for one (adopter, pet) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub pet_id: String,
    pub pet_name: String,
    pub overall_score: f64,
    pub hard_constraint_score: f64,
    pub soft_preference_score: f64,
    pub historical_score: f64,
    pub dimensions: Vec<MatchDimension>,
    pub match_reasons: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
    pub passed_hard_constraints: bool,
    pub failed_constraints: Vec<String>,
}

/// Blend weights for the three scoring components.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub hard_constraints: f64,
    pub soft_preferences: f64,
    pub historical: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            hard_constraints: 0.4,
            soft_preferences: 0.4,
            historical: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_profile_deserializes_with_defaults() {
        let profile: AdopterProfile = serde_json::from_str(
            r#"{"living_space": "small_apartment", "experience_level": "none"}"#,
        )
        .unwrap();

        assert_eq!(profile.living_space, LivingSpace::SmallApartment);
        assert_eq!(profile.experience_level, ExperienceLevel::None);
        assert_eq!(profile.daily_time_available, 2.0);
        assert_eq!(profile.family_status, FamilyStatus::Single);
        assert!(profile.landlord_allows_pets.is_none());
    }

    #[test]
    fn test_candidate_defaults() {
        let pet: PetCandidate = serde_json::from_str(r#"{"id": "p1", "name": "Rex"}"#).unwrap();

        assert_eq!(pet.size_category, SizeCategory::Medium);
        assert_eq!(pet.trainability, Trainability::Moderate);
        assert!(pet.good_with_kids);
        assert!(pet.success_rate.is_none());
    }

    #[test]
    fn test_level_ordinal() {
        assert_eq!(Level::Low.ordinal(), 0);
        assert_eq!(Level::High.ordinal() - Level::Low.ordinal(), 2);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoringWeights::default();
        assert!((w.hard_constraints + w.soft_preferences + w.historical - 1.0).abs() < 1e-9);
    }
}

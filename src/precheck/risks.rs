use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::precheck::facts::Facts;

/// Severity of a risk condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Points deducted from the risk score while the risk stands.
    pub fn penalty(self) -> f64 {
        match self {
            Severity::High => 20.0,
            Severity::Medium => 10.0,
            Severity::Low => 5.0,
        }
    }
}

/// One named risk condition over the collected facts.
///
/// Definitions are immutable and registered once in [`catalog`]; each
/// predicate is a pure function over an immutable fact snapshot and is
/// independently unit-testable.
pub struct RiskDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub check: fn(&Facts) -> bool,
}

fn size_pref_is_large(facts: &Facts) -> bool {
    matches!(facts.str_of("preferred_size"), Some("large") | Some("xlarge"))
}

static CATALOG: &[RiskDefinition] = &[
    // Economic
    RiskDefinition {
        id: "R001",
        name: "Unstable income",
        description: "Student, freelance, or frequently changing jobs",
        severity: Severity::High,
        check: |facts| {
            matches!(
                facts.str_of("income_stability"),
                Some("unstable") | Some("student")
            ) || facts.text_contains("occupation", &["student", "freelanc"])
        },
    },
    RiskDefinition {
        id: "R002",
        name: "Insufficient budget",
        description: "Low monthly budget but wants a large pet",
        severity: Severity::Medium,
        check: |facts| facts.str_of("budget_level") == Some("low") && size_pref_is_large(facts),
    },
    // Housing
    RiskDefinition {
        id: "R003",
        name: "Renting without permission",
        description: "Renting without confirmed landlord approval",
        severity: Severity::High,
        check: |facts| facts.flag("is_renting") && !facts.flag("landlord_allows_pets"),
    },
    RiskDefinition {
        id: "R004",
        name: "Not enough space",
        description: "Small apartment but wants a large pet",
        severity: Severity::High,
        check: |facts| {
            facts.str_of("living_space") == Some("small_apartment") && size_pref_is_large(facts)
        },
    },
    RiskDefinition {
        id: "R005",
        name: "Frequent moving",
        description: "Moves home more than once a year",
        severity: Severity::Medium,
        check: |facts| facts.num_or("move_frequency", 0.0) > 1.0,
    },
    // Time
    RiskDefinition {
        id: "R006",
        name: "Long work hours",
        description: "Works over 10 hours a day with nobody else to help",
        severity: Severity::High,
        check: |facts| {
            facts.num_or("work_hours_per_day", 0.0) > 10.0 && !facts.flag("has_caretaker")
        },
    },
    RiskDefinition {
        id: "R007",
        name: "Frequent travel",
        description: "Travels for work often with no care plan",
        severity: Severity::High,
        check: |facts| {
            facts.str_of("work_schedule") == Some("frequent_travel")
                && !facts.flag("travel_care_plan")
        },
    },
    RiskDefinition {
        id: "R008",
        name: "Not enough time",
        description: "Under an hour of companionship a day",
        severity: Severity::Medium,
        check: |facts| facts.num_or("daily_time_available", 0.0) < 1.0,
    },
    // Experience
    RiskDefinition {
        id: "R009",
        name: "Novice with a demanding pet",
        description: "No experience but wants a high-maintenance breed",
        severity: Severity::Medium,
        check: |facts| {
            facts.str_of("experience_level") == Some("none")
                && facts.str_of("preferred_difficulty") == Some("high")
        },
    },
    RiskDefinition {
        id: "R010",
        name: "Unrealistic expectations",
        description: "Expects a pet that never barks, sheds, or chews",
        severity: Severity::Low,
        check: |facts| {
            facts.text_contains("expectations", &["never", "not at all", "absolutely no"])
        },
    },
    // Family
    RiskDefinition {
        id: "R011",
        name: "Young children with a high-energy pet",
        description: "Children under six and a high-energy large pet",
        severity: Severity::High,
        check: |facts| {
            facts.str_of("family_status") == Some("with_kids_young")
                && facts.str_of("preferred_energy") == Some("high")
        },
    },
    RiskDefinition {
        id: "R012",
        name: "Family not in agreement",
        description: "Not all household members have agreed",
        severity: Severity::High,
        check: |facts| !facts.flag_or("family_agrees", true),
    },
    RiskDefinition {
        id: "R013",
        name: "Elderly adopter without support",
        description: "Elderly household of one with no assistance",
        severity: Severity::Medium,
        check: |facts| {
            facts.str_of("family_status") == Some("with_elderly")
                && facts.num_or("household_size", 1.0) == 1.0
        },
    },
    // Motivation
    RiskDefinition {
        id: "R014",
        name: "Impulsive adoption",
        description: "Decided in under a week without preparation",
        severity: Severity::Medium,
        check: |facts| {
            matches!(
                facts.str_of("decision_duration"),
                Some("within_a_day") | Some("within_a_week")
            )
        },
    },
    RiskDefinition {
        id: "R015",
        name: "Adopting for someone else",
        description: "A gift or a proxy adoption for somebody else",
        severity: Severity::High,
        check: |facts| {
            facts.text_contains(
                "adoption_reason",
                &["gift", "for a friend", "for my friend", "on behalf"],
            )
        },
    },
    RiskDefinition {
        id: "R016",
        name: "Improper motivation",
        description: "Wants a pet for guarding, breeding, or social media",
        severity: Severity::High,
        check: |facts| {
            facts.text_contains(
                "adoption_reason",
                &["guard", "breeding", "puppies", "photos", "influencer"],
            )
        },
    },
    // Preparation
    RiskDefinition {
        id: "R017",
        name: "No preparation",
        description: "No supplies bought and no research done",
        severity: Severity::Medium,
        check: |facts| {
            !facts.flag("has_prepared_supplies") && !facts.flag("has_researched_breed")
        },
    },
    RiskDefinition {
        id: "R018",
        name: "No contingency plan",
        description: "No plan for illness, travel, or life changes",
        severity: Severity::Medium,
        check: |facts| !facts.flag("has_contingency_plan"),
    },
    // Health
    RiskDefinition {
        id: "R019",
        name: "Allergies not ruled out",
        description: "Allergy history without testing against pets",
        severity: Severity::High,
        check: |facts| facts.flag("has_allergies") && !facts.flag("allergy_tested"),
    },
    RiskDefinition {
        id: "R020",
        name: "Health limitations",
        description: "A health condition that may affect pet care",
        severity: Severity::Medium,
        check: |facts| {
            facts.text_contains(
                "health_issues",
                &["limited mobility", "serious illness", "bedridden"],
            )
        },
    },
];

/// The full immutable risk table, in priority (insertion) order.
pub fn catalog() -> &'static [RiskDefinition] {
    CATALOG
}

/// Look up one definition by id.
pub fn find(id: &str) -> Option<&'static RiskDefinition> {
    CATALOG.iter().find(|def| def.id == id)
}

/// Evaluate the catalog against a fact snapshot.
///
/// Returns every triggered definition whose id is not in `seen` (already
/// identified or clarified). A panicking predicate is isolated, logged as
/// non-fatal, and skipped without aborting the rest of the pass.
pub fn evaluate(facts: &Facts, seen: &[String]) -> Vec<&'static RiskDefinition> {
    CATALOG
        .iter()
        .filter(|def| !seen.iter().any(|id| id == def.id))
        .filter(|def| {
            catch_unwind(AssertUnwindSafe(|| (def.check)(facts))).unwrap_or_else(|_| {
                tracing::warn!("Risk predicate {} panicked, skipping", def.id);
                false
            })
        })
        .collect()
}

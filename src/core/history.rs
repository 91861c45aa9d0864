use crate::models::PetCandidate;

/// Score the historical adoption outcome prior for a pet.
///
/// A pet with an observed success rate scores rate x 100; a pet with no
/// history gets a neutral 50 so cold-start candidates are neither rewarded
/// nor punished.
pub fn historical_score(pet: &PetCandidate) -> (f64, String) {
    match pet.success_rate {
        Some(rate) => (
            rate * 100.0,
            format!("Historical adoption success rate: {:.1}%", rate * 100.0),
        ),
        None => (
            50.0,
            "Cold start: no adoption history yet, using a neutral prior".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(success_rate: Option<f64>) -> PetCandidate {
        let mut pet: PetCandidate =
            serde_json::from_str(r#"{"id": "p1", "name": "Rex"}"#).unwrap();
        pet.success_rate = success_rate;
        pet
    }

    #[test]
    fn test_known_rate() {
        let (score, reason) = historical_score(&pet(Some(0.72)));
        assert!((score - 72.0).abs() < 1e-9);
        assert!(reason.contains("72.0%"));
    }

    #[test]
    fn test_cold_start_is_neutral() {
        let (score, reason) = historical_score(&pet(None));
        assert_eq!(score, 50.0);
        assert!(reason.contains("Cold start"));
    }

    #[test]
    fn test_extremes() {
        assert_eq!(historical_score(&pet(Some(0.0))).0, 0.0);
        assert_eq!(historical_score(&pet(Some(1.0))).0, 100.0);
    }
}

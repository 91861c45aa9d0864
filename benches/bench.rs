// Criterion benchmarks for PawPal Algo

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pawpal_algo::core::{adopter_profile_to_text, check_hard_constraints, Matcher};
use pawpal_algo::models::{AdopterProfile, ExperienceLevel, Level, PetCandidate, SizeCategory};
use pawpal_algo::providers::EmbeddingClient;

fn create_candidate(id: usize) -> PetCandidate {
    let mut pet: PetCandidate = serde_json::from_str(&format!(
        r#"{{"id": "{id}", "name": "Pet {id}", "breed": "Mixed"}}"#
    ))
    .unwrap();
    pet.size_category = match id % 5 {
        0 => SizeCategory::Tiny,
        1 => SizeCategory::Small,
        2 => SizeCategory::Medium,
        3 => SizeCategory::Large,
        _ => SizeCategory::Xlarge,
    };
    pet.energy_level = match id % 3 {
        0 => Level::Low,
        1 => Level::Medium,
        _ => Level::High,
    };
    pet.success_rate = if id % 2 == 0 { Some(0.6) } else { None };
    pet
}

fn create_adopter() -> AdopterProfile {
    AdopterProfile {
        daily_time_available: 3.0,
        experience_level: ExperienceLevel::Experienced,
        preferred_temperament: vec!["calm".to_string(), "friendly".to_string()],
        ..Default::default()
    }
}

fn offline_matcher() -> Matcher {
    let embeddings = Arc::new(EmbeddingClient::new(
        "http://localhost:0".to_string(),
        None,
        "bench-embed".to_string(),
        256,
        10_000,
        600,
    ));
    Matcher::with_default_weights(embeddings)
}

fn bench_hard_constraints(c: &mut Criterion) {
    let adopter = create_adopter();
    let pet = create_candidate(1);

    c.bench_function("hard_constraint_check", |b| {
        b.iter(|| check_hard_constraints(black_box(&adopter), black_box(&pet)));
    });
}

fn bench_profile_text(c: &mut Criterion) {
    let adopter = create_adopter();

    c.bench_function("adopter_profile_to_text", |b| {
        b.iter(|| adopter_profile_to_text(black_box(&adopter)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let matcher = offline_matcher();
    let adopter = create_adopter();

    let mut group = c.benchmark_group("matching");

    for candidate_count in [10usize, 50, 100, 500].iter() {
        let candidates: Vec<PetCandidate> =
            (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(candidate_count),
            &candidates,
            |b, candidates| {
                b.iter(|| {
                    rt.block_on(matcher.find_best_matches(
                        black_box(&adopter),
                        black_box(candidates),
                        10,
                    ))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hard_constraints,
    bench_profile_text,
    bench_matching
);
criterion_main!(benches);

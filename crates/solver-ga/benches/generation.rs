use criterion::{criterion_group, criterion_main, Criterion};
use sched_core::{Catalog, GaParams, Instance};
use solver_ga::GeneticSearch;
use std::hint::black_box;

/// Eight groups over a 5x4 week with a handful of shared lecturers and rooms.
fn build_instance() -> Instance {
    let days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
    let times: Vec<_> = days
        .iter()
        .flat_map(|d| (1..=4).map(move |p| serde_json::json!({"day": d, "time": p})))
        .collect();
    let subjects: Vec<_> = (0..6)
        .map(|i| serde_json::json!({"name": format!("S{i}"), "hours": 1 + i % 2}))
        .collect();
    let groups: Vec<_> = (0..8)
        .map(|i| {
            let names: Vec<_> = (0..6).filter(|s| (s + i) % 3 != 0).map(|s| format!("S{s}")).collect();
            serde_json::json!({"title": format!("G{i}"), "student_count": 15 + 3 * i, "subject_names": names})
        })
        .collect();
    let lectors: Vec<_> = (0..6)
        .map(|i| {
            serde_json::json!({"name": format!("L{i}"), "can_teach": [format!("S{i}"), format!("S{}", (i + 1) % 6)]})
        })
        .collect();
    let classrooms: Vec<_> = (0..5)
        .map(|i| serde_json::json!({"name": format!("R{i}"), "max_student_count": 30 + 10 * i}))
        .collect();
    serde_json::from_value(serde_json::json!({
        "times": times,
        "subjects": subjects,
        "groups": groups,
        "lectors": lectors,
        "classrooms": classrooms,
    }))
    .expect("bench instance")
}

fn bench_generation(c: &mut Criterion) {
    let inst = build_instance();
    let catalog = Catalog::new(&inst).expect("valid bench instance");
    let params = GaParams {
        population_size: 40,
        seed: 7,
        ..GaParams::default()
    };
    let search = GeneticSearch::new(&catalog, &params);
    let (population, _) = search.initial_population().expect("feasible bench instance");

    c.bench_function("ga/next_generation_40", |b| {
        b.iter(|| black_box(search.next_generation(black_box(&population), 0)))
    });

    let schedule = population[0].schedule.clone();
    c.bench_function("schedule/is_valid", |b| {
        b.iter(|| black_box(black_box(&schedule).is_valid()))
    });
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);

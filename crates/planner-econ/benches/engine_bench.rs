use criterion::{criterion_group, criterion_main, Criterion};
use planner_core::{OpexModel, RoiParameters, SimulatorParameters};
use planner_econ::{calculate_budget, calculate_roi};

fn bench_engines(c: &mut Criterion) {
    let params = SimulatorParameters::default();
    let mut sessions = params.clone();
    sessions.opex_model = OpexModel::SessionsBased;
    let roi = RoiParameters::default();

    c.bench_function("budget_room_based", |b| {
        b.iter(|| calculate_budget(&params))
    });
    c.bench_function("budget_sessions_based", |b| {
        b.iter(|| calculate_budget(&sessions))
    });
    let budget = calculate_budget(&params);
    c.bench_function("roi_default", |b| {
        b.iter(|| calculate_roi(&params, &budget, &roi))
    });
}

criterion_group!(benches, bench_engines);
criterion_main!(benches);

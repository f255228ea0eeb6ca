use criterion::{criterion_group, criterion_main, Criterion};
use steady_core::geometry::Rect;
use steady_core::history::{CursorHistory, CursorSample};
use steady_core::predictor::{Candidate, TargetPredictor};
use steady_core::tremor::TremorAnalyzer;
use steady_core::view::ElementId;
use std::hint::black_box;

fn setup_history() -> CursorHistory {
    // slow drift east with a little jitter
    CursorHistory::from_samples(
        10,
        (0..10).map(|i| {
            let jitter = if i % 2 == 0 { 2.0 } else { -2.0 };
            CursorSample::new(i as f64 * 4.0, jitter, i * 25)
        }),
    )
}

fn setup_candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            let r = 40.0 + (i % 5) as f64 * 15.0;
            Candidate::new(
                ElementId(i as u64 + 1),
                Rect::centered(r * angle.cos(), r * angle.sin(), 60.0, 24.0),
            )
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let history = setup_history();
    let predictor = TargetPredictor::default();
    let analyzer = TremorAnalyzer::default();

    for n in [4, 32] {
        let candidates = setup_candidates(n);
        c.bench_function(&format!("predict ({} candidates)", n), |b| {
            b.iter(|| predictor.predict(black_box(&history), black_box(&candidates)))
        });
    }

    c.bench_function("tremor analyze (10 samples)", |b| {
        b.iter(|| analyzer.analyze(black_box(&history)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

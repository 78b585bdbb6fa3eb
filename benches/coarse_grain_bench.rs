use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use series_distance::{
    coarse_grain, define_segments, series_distance, CoarseGrainingParameters, ErrorModel,
};

/// Flood wave with `wiggles` superimposed oscillations over `len` samples
fn generate_event(len: usize, shift: f64, wiggles: f64) -> Vec<f64> {
    let peak_at = len as f64 * 0.4 + shift;
    (0..len)
        .map(|i| {
            let t = i as f64;
            let wave = 50.0 * (-((t - peak_at) / (len as f64 / 8.0)).powi(2)).exp();
            10.0 + wave + 1.5 * (t * wiggles).sin()
        })
        .collect()
}

fn bench_coarse_grain(c: &mut Criterion) {
    let mut group = c.benchmark_group("CoarseGrain");
    group.sample_size(20);
    let params = CoarseGrainingParameters::default();

    for &len in &[24usize, 48, 96] {
        let obs = generate_event(len, 0.0, 1.1);
        let sim = generate_event(len, 3.0, 0.9);
        let index: Vec<usize> = (0..len).collect();

        group.bench_with_input(BenchmarkId::new("event", len), &len, |b, _| {
            b.iter(|| coarse_grain(black_box(&obs), &index, black_box(&sim), &index, &params))
        });
    }
    group.finish();
}

fn bench_series_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("SeriesDistance");

    for &len in &[100usize, 1000] {
        // smooth series give a single rise and a single fall
        let obs = generate_event(len, 0.0, 0.0);
        let sim = generate_event(len, 5.0, 0.0);
        let positions: Vec<usize> = (0..len).collect();
        let obs_segs = define_segments(&positions, &obs).unwrap();
        let sim_segs = define_segments(&positions, &sim).unwrap();

        for model in [ErrorModel::Standard, ErrorModel::Relative] {
            group.bench_with_input(
                BenchmarkId::new(model.to_string(), len),
                &len,
                |b, _| {
                    b.iter(|| {
                        series_distance(black_box(&obs), &obs_segs, black_box(&sim), &sim_segs, model)
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_coarse_grain, bench_series_distance);
criterion_main!(benches);

//! Benchmarks for the ZCAM gamut crates.
//!
//! Run with: `cargo bench`

use std::collections::HashMap;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use zcam_cache::{Float64Table, HashSeed};
use zcam_color::{Jch, Rgb, ViewingConditions, ZcamColor, linear_rgb_from_jch};
use zcam_gamut::{GamutConfig, GamutEngine, direct_cusp};
use zcam_math::{CubicSpline, bisect_boundary, golden_section_max};

/// Keys spread like packed (hue, lightness) buckets.
fn keys(n: usize) -> Vec<u32> {
    (0..n as u32).map(|i| i.wrapping_mul(2_654_435_761) ^ (i << 7)).collect()
}

/// Float64Table against std HashMap.
fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");

    for size in [1_000, 100_000] {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("float64table_set", size), &keys, |b, keys| {
            b.iter(|| {
                let mut t = Float64Table::with_seed(128, 1 << 24, HashSeed::fixed(1));
                for &k in keys {
                    t.set(k, k as f64);
                }
                t
            })
        });

        group.bench_with_input(BenchmarkId::new("hashmap_set", size), &keys, |b, keys| {
            b.iter(|| {
                let mut m = HashMap::new();
                for &k in keys {
                    m.insert(k, k as f64);
                }
                m
            })
        });

        let mut table = Float64Table::with_seed(128, 1 << 24, HashSeed::fixed(1));
        table.extend(keys.iter().map(|&k| (k, k as f64)));
        let map: HashMap<u32, f64> = keys.iter().map(|&k| (k, k as f64)).collect();

        group.bench_with_input(BenchmarkId::new("float64table_get", size), &keys, |b, keys| {
            b.iter(|| keys.iter().filter_map(|&k| table.get(black_box(k))).sum::<f64>())
        });

        group.bench_with_input(BenchmarkId::new("hashmap_get", size), &keys, |b, keys| {
            b.iter(|| keys.iter().filter_map(|k| map.get(black_box(k))).sum::<f64>())
        });
    }

    // Bounded table under constant purging
    let keys = keys(200_000);
    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("float64table_purge", |b| {
        b.iter(|| {
            let mut t = Float64Table::with_seed(128, 4096, HashSeed::fixed(1));
            for &k in &keys {
                t.set(k, 1.0);
            }
            t.len()
        })
    });

    group.finish();
}

/// Search primitives and spline evaluation.
fn bench_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("math");

    group.bench_function("bisect_boundary", |b| {
        b.iter(|| bisect_boundary(|x| x * x <= black_box(2.0), 0.0, 2.0, 1e-12))
    });

    group.bench_function("golden_section_max", |b| {
        b.iter(|| golden_section_max(|x| -(x - black_box(0.3)).powi(2), 0.0, 1.0, 1e-9))
    });

    let xs: Vec<f64> = (0..37).map(|i| i as f64 * 10.0).collect();
    let ys: Vec<f64> = xs.iter().map(|x| x.to_radians().sin()).collect();
    let spline = CubicSpline::new(xs, ys).unwrap();
    let ts: Vec<f64> = (0..1000).map(|i| i as f64 * 0.36).collect();
    group.throughput(Throughput::Elements(ts.len() as u64));
    group.bench_function("spline_eval", |b| {
        b.iter(|| ts.iter().map(|&t| spline.eval(black_box(t))).sum::<f64>())
    });

    group.finish();
}

/// Appearance model conversions.
fn bench_zcam(c: &mut Criterion) {
    let mut group = c.benchmark_group("zcam");
    let viewing = ViewingConditions::default();

    let colors: Vec<Rgb> = (0..1000)
        .map(|i| Rgb::new((i % 10) as f64 / 9.0, (i / 10 % 10) as f64 / 9.0, (i / 100) as f64 / 9.0))
        .collect();
    group.throughput(Throughput::Elements(colors.len() as u64));

    group.bench_function("from_srgb", |b| {
        b.iter(|| colors.iter().map(|&c| ZcamColor::from_srgb(black_box(c), &viewing).chroma).sum::<f64>())
    });

    let jchs: Vec<Jch> = colors.iter().map(|&c| ZcamColor::from_srgb(c, &viewing).jch()).collect();
    group.bench_function("linear_rgb_from_jch", |b| {
        b.iter(|| jchs.iter().map(|&j| linear_rgb_from_jch(black_box(j), &viewing).g).sum::<f64>())
    });

    group.finish();
}

/// Gamut queries, unbuilt and built.
fn bench_gamut(c: &mut Criterion) {
    let mut group = c.benchmark_group("gamut");
    group.sample_size(10);
    let viewing = ViewingConditions::default();
    let config = GamutConfig::default();

    group.bench_function("direct_cusp", |b| b.iter(|| direct_cusp(&viewing, &config, black_box(259.0))));

    let mut engine = GamutEngine::new(viewing.clone());
    engine.build_boundary().unwrap();
    group.bench_function("spline_cusp", |b| b.iter(|| engine.find_cusp(black_box(259.0))));

    // Distinct buckets each iteration so the cache never answers
    let mut lightness = 1.0;
    group.bench_function("maximize_chroma_miss", |b| {
        b.iter(|| {
            lightness = if lightness > 98.0 { 1.0 } else { lightness + 0.0173 };
            engine.maximize_chroma(black_box(200.0), lightness, 1e-3)
        })
    });

    engine.maximize_chroma(200.0, 50.0, 1e-3).unwrap();
    group.bench_function("maximize_chroma_hit", |b| {
        b.iter(|| engine.maximize_chroma(black_box(200.0), 50.0, 1e-3))
    });

    group.finish();
}

criterion_group!(benches, bench_cache, bench_math, bench_zcam, bench_gamut);

criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use solestore_catalog::{
    CurrentLocation, FilterPatch, ListingConfig, ListingEngine, Product, HIGHEST_PRICE,
};

const COLORS: [&str; 5] = ["Black", "White", "Red", "Blue", "Grey"];
const HEIGHTS: [&str; 3] = ["LOW", "MID", "HIGH"];

fn catalog(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| {
            Product::new(i.to_string().as_str(), (i % 400) as f64 + 20.0)
                .with_color(COLORS[i % COLORS.len()])
                .with_height(HEIGHTS[i % HEIGHTS.len()])
                .with_sizes([7.0 + (i % 8) as f64, 7.5 + (i % 8) as f64])
                .with_year(2018 + (i % 8) as i32)
                .with_ratings((i % 5) as f64)
        })
        .collect()
}

fn engine(n: usize) -> ListingEngine<CurrentLocation> {
    ListingEngine::with_config(
        catalog(n),
        FilterPatch::new().gender("MEN"),
        ListingConfig {
            price_ceiling: HIGHEST_PRICE,
            current_year: 2026,
        },
        CurrentLocation::default(),
    )
}

fn bench_filter_listings(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_listings");

    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("all_fields", size), &size, |b, &size| {
            let mut engine = engine(size);
            let patch = FilterPatch::new()
                .color(["Black", "Red"])
                .size([9.0, 10.5])
                .height(["LOW", "MID"])
                .price(40.0, 300.0)
                .year([2020, 2021, 2022]);

            b.iter(|| {
                black_box(engine.filter_listings(black_box(patch.clone())).len());
            });
        });
    }

    group.finish();
}

fn bench_sort_listings(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_listings");

    for size in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("price_then_ratings", size), &size, |b, &size| {
            let mut engine = engine(size);
            b.iter(|| {
                engine.sort_listings("asc_price");
                black_box(engine.sort_listings("ratings").len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter_listings, bench_sort_listings);
criterion_main!(benches);

//! Benchmarks for image classification and embed rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use enclave_renderer::{TransformOptions, classify, render_markdown};

const DESTINATIONS: [&str; 6] = [
    "https://www.youtube.com/watch?v=abc123",
    "https://x.com/user/status/1?theme=dark",
    "https://quaily.com/list/p/post",
    "https://open.spotify.com/track/5vdp5UmvTsnMEMESIF2Ym7",
    "https://example.com/pic.jpg|200x100",
    "https://example.com/pic.jpg",
];

/// Generate markdown with one image per paragraph, cycling through providers.
fn generate_markdown(images: usize) -> String {
    let mut md = String::with_capacity(images * 80);
    for i in 0..images {
        let destination = DESTINATIONS[i % DESTINATIONS.len()];
        md.push_str(&format!("Paragraph {i} with an image.\n\n![image {i}]({destination})\n\n"));
    }
    md
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    for destination in DESTINATIONS {
        group.bench_with_input(BenchmarkId::from_parameter(destination), destination, |b, d| {
            b.iter(|| classify(black_box(d), None, "alt"));
        });
    }
    group.finish();
}

fn bench_render_markdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_markdown");
    let options = TransformOptions::default();
    for images in [10, 100] {
        let markdown = generate_markdown(images);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(images), &markdown, |b, md| {
            b.iter(|| render_markdown(black_box(md), &options));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_render_markdown);
criterion_main!(benches);

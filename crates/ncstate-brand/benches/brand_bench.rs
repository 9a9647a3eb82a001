// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the brand crate: contrast evaluation across the
// whole palette and brand bar URL construction.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ncstate_brand::{BarOptions, BrandBar, BrandPalette, ContrastReport, WcagLevel};

fn bench_palette_contrast(c: &mut Criterion) {
    let palette = BrandPalette::new();
    let colors = palette.colors();

    c.bench_function("contrast_report (all pairs)", |b| {
        b.iter(|| {
            for fg in &colors {
                for bg in &colors {
                    black_box(ContrastReport::evaluate(fg.rgb(), bg.rgb(), 12.0, false));
                }
            }
        });
    });

    c.bench_function("accessible_pairs (AA, 18pt)", |b| {
        b.iter(|| black_box(palette.accessible_pairs(black_box(18.0), false, WcagLevel::AA)));
    });
}

fn bench_iframe_url(c: &mut Criterion) {
    let bar = BrandBar::new(BarOptions {
        site_url: "https://www.ncsu.edu/oit/".into(),
        ..BarOptions::default()
    });

    c.bench_function("iframe_url", |b| b.iter(|| black_box(bar.iframe_url())));
}

criterion_group!(benches, bench_palette_contrast, bench_iframe_url);
criterion_main!(benches);

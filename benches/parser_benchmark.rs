use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pmw_core::context::ParserContext;

fn benchmark_single_bar(c: &mut Criterion) {
    let source = "[stave 1 treble]\nc- d- e- f- |\n[endstave]\n";
    c.bench_function("parse single bar", |b| {
        b.iter(|| {
            let mut ctx = ParserContext::new();
            pmw_core::run_pipeline(black_box(source), &mut ctx).unwrap();
        })
    });
}

fn benchmark_many_bars(c: &mut Criterion) {
    let mut source = String::from("[stave 1 treble]\n");
    for _ in 0..64 {
        source.push_str("c- d- e- f- | g' a' b' c' |\n");
    }
    source.push_str("[endstave]\n");
    c.bench_function("parse 128 bars", |b| {
        b.iter(|| {
            let mut ctx = ParserContext::new();
            pmw_core::run_pipeline(black_box(&source), &mut ctx).unwrap();
        })
    });
}

fn benchmark_macro_expansion(c: &mut Criterion) {
    let mut source = String::from("*define q() c- d- e- f-\n[stave 1]\n");
    for _ in 0..64 {
        source.push_str("&q() |\n");
    }
    source.push_str("[endstave]\n");
    c.bench_function("parse with macro expansion", |b| {
        b.iter(|| {
            let mut ctx = ParserContext::new();
            pmw_core::run_pipeline(black_box(&source), &mut ctx).unwrap();
        })
    });
}

fn benchmark_chords_and_slurs(c: &mut Criterion) {
    let source = "[stave 1]\n[slur] (c- e- g-) d- e- f- [endslur] |\n[endstave]\n";
    c.bench_function("parse chords and slurs", |b| {
        b.iter(|| {
            let mut ctx = ParserContext::new();
            pmw_core::run_pipeline(black_box(source), &mut ctx).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_single_bar,
    benchmark_many_bars,
    benchmark_macro_expansion,
    benchmark_chords_and_slurs,
);
criterion_main!(benches);

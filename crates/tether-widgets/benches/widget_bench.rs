//! Benchmarks for the widget boundary.
//!
//! Measures one forward pass for a ranged textbox (parse, snap, write), one
//! reverse pass for a slider, and label lookup for dropdowns of growing size.
//!
//! Run with: cargo bench -p tether-widgets --bench widget_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::rc::Rc;

use tether_core::{NativeBounds, StepRange};
use tether_harness::SimWidget;
use tether_runtime::reactive::Seed;
use tether_widgets::{Choices, Dropdown, InputWidget, Slider, Textbox, WidgetOptions};

fn bench_textbox_forward(c: &mut Criterion) {
    let native = SimWidget::new(String::new());
    let tb = Textbox::bind_ranged(
        Rc::clone(&native),
        StepRange::new(0i64, 5, 10_000).unwrap(),
        Seed::new(),
        &WidgetOptions::new(),
    )
    .unwrap();
    let inputs = ["17", "4096", "not a number", "9999"];
    let mut i = 0usize;
    c.bench_function("widgets/textbox_forward", |b| {
        b.iter(|| {
            i = (i + 1) % inputs.len();
            native.user_input(black_box(inputs[i]).to_owned()).ok();
        });
    });
    black_box(tb.value());
}

fn bench_slider_reverse(c: &mut Criterion) {
    let native = SimWidget::ranged(NativeBounds::new(0.0, 1.0, 1.0), 0.0);
    let slider = Slider::slider(
        Rc::clone(&native),
        StepRange::new(0i32, 1, 1_000).unwrap(),
        Seed::new(),
        &WidgetOptions::new(),
    )
    .unwrap();
    let mut next = 0i32;
    c.bench_function("widgets/slider_reverse", |b| {
        b.iter(|| {
            next = (next + 1) % 1_000;
            slider.set_value(black_box(next)).ok();
        });
    });
}

fn bench_dropdown_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("widgets/dropdown_select");
    for &n in &[8usize, 64, 512] {
        let labels: Vec<String> = (0..n).map(|i| format!("option-{i}")).collect();
        let native = SimWidget::choice();
        let dd = Dropdown::bind(
            Rc::clone(&native),
            Choices::labels(labels.iter().cloned()),
            Seed::new(),
            &WidgetOptions::new(),
        )
        .unwrap();
        let mut i = 0usize;
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                i = (i + 7) % n;
                dd.select(Some(black_box(labels[i].as_str()))).ok();
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_textbox_forward,
    bench_slider_reverse,
    bench_dropdown_select
);
criterion_main!(benches);

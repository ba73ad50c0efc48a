//! Criterion benchmarks for the relay packet codec and coordinate mapping.
//!
//! Both sit on the per-event hot path: every captured event is encoded once,
//! every received datagram is decoded once, and every actuation pass maps one
//! pixel position into normalized space.
//!
//! Run with:
//! ```bash
//! cargo bench --package relay-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use relay_core::protocol::codec::{decode_event, encode_event};
use relay_core::protocol::messages::{InputEvent, MouseButton, WHEEL_DELTA};
use relay_core::{to_normalized, DesktopArea};

fn fixtures() -> [(&'static str, InputEvent); 4] {
    [
        ("MouseMove", InputEvent::MouseMove { dx: 12, dy: -7 }),
        ("MouseButton", InputEvent::button(MouseButton::Left, true)),
        ("Key", InputEvent::key(0x41, true)),
        ("MouseWheel", InputEvent::MouseWheel { delta: -WHEEL_DELTA }),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_event");
    for (name, event) in fixtures() {
        group.bench_with_input(BenchmarkId::new("event", name), &event, |b, event| {
            b.iter(|| encode_event(black_box(event)))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_event");
    for (name, event) in fixtures() {
        let bytes = encode_event(&event);
        group.bench_with_input(BenchmarkId::new("event", name), &bytes, |b, bytes| {
            b.iter(|| decode_event(black_box(bytes)).expect("decode must succeed"))
        });
    }
    group.finish();
}

fn bench_to_normalized(c: &mut Criterion) {
    let area = DesktopArea::new(-1920, 0, 4480, 1440);
    c.bench_function("to_normalized", |b| {
        b.iter(|| to_normalized(black_box(&area), black_box(1234), black_box(987)))
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_to_normalized);
criterion_main!(benches);

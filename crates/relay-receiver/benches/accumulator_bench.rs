//! Criterion benchmarks for the receive-side hot path.
//!
//! Every motion datagram goes through `EventDispatcher::dispatch` and, in the
//! common coalesced case, ends in two `fetch_add`s and a failed
//! compare-exchange.  These benches keep that path honest.
//!
//! Run with:
//! ```bash
//! cargo bench --package relay-receiver --bench accumulator_bench
//! ```

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relay_core::{encode_event, InputEvent};
use relay_receiver::application::actuate_motion::{
    MotionAccumulator, MotionWriter, WakeError, WakeSignal,
};
use relay_receiver::application::dispatch_event::EventDispatcher;
use relay_receiver::infrastructure::input_emulation::dry_run::DryRunEmulator;

struct NoopWake;

impl WakeSignal for NoopWake {
    fn wake(&self) -> Result<(), WakeError> {
        Ok(())
    }
}

fn bench_accumulator_add(c: &mut Criterion) {
    let acc = MotionAccumulator::new();
    acc.add(1, 1); // arm once so the bench measures the coalesced path
    c.bench_function("accumulator_add_coalesced", |b| {
        b.iter(|| acc.add(black_box(3), black_box(-2)))
    });
}

fn bench_dispatch_motion(c: &mut Criterion) {
    let acc = Arc::new(MotionAccumulator::new());
    let writer = MotionWriter::new(Arc::clone(&acc), Arc::new(NoopWake));
    let dispatcher = EventDispatcher::new(writer, Arc::new(DryRunEmulator));
    let bytes = encode_event(&InputEvent::MouseMove { dx: 5, dy: -5 });

    c.bench_function("dispatch_mouse_move", |b| {
        b.iter(|| dispatcher.dispatch(black_box(&bytes)))
    });
}

criterion_group!(benches, bench_accumulator_add, bench_dispatch_motion);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use herald_event_bus::{
    EventBus, LocalEventBus, LockPolicy, Priority, Receiver, SharedEventBus, make_func,
    make_method,
};
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
struct Tick {
    value: u64,
}

fn bump(tick: &mut Tick) {
    tick.value = tick.value.wrapping_add(1);
}

#[derive(Debug, Default)]
struct Sink {
    total: AtomicU64,
}

impl Sink {
    fn absorb(&self, tick: &mut Tick) {
        self.total.fetch_add(tick.value, Ordering::Relaxed);
    }
}

fn populate<P>(bus: &EventBus<P>, sink: &Arc<Sink>, subscribers: usize)
where
    P: LockPolicy,
    Arc<Sink>: Receiver<Sink, P>,
{
    for i in 0..subscribers {
        let priority = Priority::ALL[i % Priority::ALL.len()];
        if i % 2 == 0 {
            bus.subscribe_with_priority(make_func(bump), priority);
        } else {
            bus.subscribe_with_priority(make_method(sink, Sink::absorb), priority);
        }
    }
}

// ============================================================================
// Benchmark: Publish fan-out
// ============================================================================

fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");

    for subscribers in [1usize, 16, 128] {
        let sink = Arc::new(Sink::default());
        let shared = SharedEventBus::new();
        let local = LocalEventBus::new();
        populate(&shared, &sink, subscribers);
        populate(&local, &sink, subscribers);

        group.throughput(Throughput::Elements(subscribers as u64));

        group.bench_with_input(BenchmarkId::new("shared", subscribers), &shared, |b, bus| {
            b.iter(|| {
                let mut tick = Tick::default();
                black_box(bus.publish(&mut tick));
                black_box(tick.value);
            });
        });

        group.bench_with_input(BenchmarkId::new("local", subscribers), &local, |b, bus| {
            b.iter(|| {
                let mut tick = Tick::default();
                black_box(bus.publish(&mut tick));
                black_box(tick.value);
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Subscription churn
// ============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    for existing in [0usize, 64] {
        let sink = Arc::new(Sink::default());
        let bus = SharedEventBus::new();
        populate(&bus, &sink, existing);

        group.bench_with_input(BenchmarkId::new("subscribe_unsubscribe", existing), &bus, |b, bus| {
            b.iter(|| {
                bus.subscribe_with_priority(make_func(bump), Priority::High);
                black_box(bus.unsubscribe(&make_func(bump)));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_publish, bench_churn);
criterion_main!(benches);

use std::{
    hint::black_box,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use topicast::{Broker, Message, MessagePayload};

fn counting_broker(subscribers: usize) -> (Broker, Arc<AtomicUsize>) {
    let broker = Broker::default();
    broker.create_topic("chan").unwrap();
    let counter = Arc::new(AtomicUsize::new(0));
    for i in 0..subscribers {
        let c = counter.clone();
        broker
            .subscribe("chan", &format!("sub-{i}"), move |_: &str, _: &Message| {
                c.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
    }
    (broker, counter)
}

fn bench_publish_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_fanout");
    for subs in [0usize, 1, 10, 100] {
        group.throughput(Throughput::Elements(subs.max(1) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(subs), &subs, |b, &subs| {
            let (broker, _counter) = counting_broker(subs);
            b.iter(|| {
                broker
                    .publish(
                        "chan",
                        black_box(MessagePayload::Bytes(Bytes::from_static(b"x"))),
                    )
                    .unwrap();
            })
        });
    }
    group.finish();
}

fn bench_publish_payloads(c: &mut Criterion) {
    let (broker, _counter) = counting_broker(1);
    let text = "x".repeat(256);
    let json = serde_json::json!({ "user": "alice", "scores": [1, 2, 3] });

    c.bench_function("publish_string_256", |b| {
        b.iter(|| broker.publish("chan", black_box(text.as_str())).unwrap())
    });
    c.bench_function("publish_json", |b| {
        b.iter(|| broker.publish("chan", black_box(json.clone())).unwrap())
    });
}

fn bench_subscribe(c: &mut Criterion) {
    let broker = Broker::default();
    broker.create_topic("chan").unwrap();
    c.bench_function("broker_subscribe_same_id", |b| {
        b.iter(|| {
            broker
                .subscribe("chan", black_box("alice"), |_: &str, _: &Message| {})
                .unwrap()
        })
    });
}

fn bench_create_topic(c: &mut Criterion) {
    c.bench_function("create_100_topics", |b| {
        b.iter_batched(
            Broker::default,
            |broker| {
                for i in 0..100 {
                    broker.create_topic(&format!("topic-{i}")).unwrap();
                }
                broker
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_publish_fanout,
    bench_publish_payloads,
    bench_subscribe,
    bench_create_topic
);
criterion_main!(benches);

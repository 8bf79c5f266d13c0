use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use oneway::{combine, create_reducer, CaseReducer, RawAction, ReducerError, Store};

fn counter(state: Option<Arc<i64>>, action: &RawAction<i64>) -> Result<Arc<i64>, ReducerError> {
    let count = state.map_or(0, |s| *s);
    Ok(Arc::new(count + action.payload().copied().unwrap_or(1)))
}

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| Store::create(counter).map(|store| black_box(store.get_state())));
    });
}

fn store_read_benchmark(c: &mut Criterion) {
    let store = Store::new(counter, 42_i64);

    c.bench_function("store_read", |b| {
        b.iter(|| {
            black_box(store.get_state());
        });
    });
}

fn store_dispatch_benchmark(c: &mut Criterion) {
    let store = Store::new(counter, 0_i64);

    c.bench_function("store_dispatch", |b| {
        let mut i = 0;
        b.iter(|| {
            let _ = store.dispatch(RawAction::with_payload("ADD", black_box(i)));
            i += 1;
        });
    });
}

fn case_reducer_dispatch_benchmark(c: &mut Criterion) {
    #[derive(Clone, PartialEq)]
    struct State {
        counter: i64,
        name: String,
    }

    let reducer: CaseReducer<State, RawAction<i64>> = create_reducer(
        State {
            counter: 0,
            name: "test".to_string(),
        },
        |builder| {
            builder
                .add_case("ADD", |state, action| {
                    state.counter += action.payload().copied().unwrap_or(1);
                })
                .add_case("RENAME", |state, _| state.name.push('!'));
        },
    );
    let store = Store::create(reducer).unwrap();

    c.bench_function("case_reducer_dispatch", |b| {
        let mut i = 0;
        b.iter(|| {
            let _ = store.dispatch(RawAction::with_payload("ADD", black_box(i)));
            i += 1;
        });
    });
}

fn combined_dispatch_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("combined_dispatch");

    for slice_count in [1, 10, 100].iter() {
        let root = (0..*slice_count).fold(combine(), |root, i| {
            root.slice(format!("slice-{i}"), counter)
        });
        let store = Store::create(root).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(slice_count),
            slice_count,
            |b, _| {
                b.iter(|| {
                    let _ = store.dispatch(RawAction::new(black_box("ADD")));
                });
            },
        );
    }
    group.finish();
}

fn store_subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_subscribe");

    for subscriber_count in [1, 10, 100].iter() {
        let store = Store::new(counter, 0_i64);

        for _ in 0..*subscriber_count {
            store.subscribe(|| {
                // Empty subscriber
            });
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    let _ = store.dispatch(RawAction::with_payload("ADD", black_box(i)));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    store_creation_benchmark,
    store_read_benchmark,
    store_dispatch_benchmark,
    case_reducer_dispatch_benchmark,
    combined_dispatch_benchmark,
    store_subscribe_benchmark,
);
criterion_main!(benches);

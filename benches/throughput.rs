use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rust_decimal::Decimal;
use rusty_tally::{
    summarize, KeyValueStorage, MemoryStorage, StorageError, TransactionKind, TransactionRequest,
    TransactionStore, STORAGE_KEY,
};
use std::time::Duration;

const NUM_TRANSACTIONS: u64 = 10_000;

/// Accepts every write without keeping it, so adds measure the store alone.
struct NoopStorage;

impl KeyValueStorage for NoopStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

fn request(i: u64) -> TransactionRequest {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let date = start.checked_add_days(Days::new(i % 1500)).unwrap();
    if i % 3 == 0 {
        TransactionRequest::new(
            TransactionKind::Income,
            "Salary",
            Decimal::from(1000 + i % 50),
            date,
            format!("pay {i}"),
        )
    } else {
        TransactionRequest::new(
            TransactionKind::Expense,
            "Food",
            Decimal::new((i % 10_000 + 1) as i64, 2),
            date,
            format!("meal {i}"),
        )
    }
}

fn filled_store() -> TransactionStore<NoopStorage> {
    let mut store = TransactionStore::open(NoopStorage);
    for i in 0..NUM_TRANSACTIONS {
        store.add(request(i)).unwrap();
    }
    store
}

fn store_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    group.throughput(Throughput::Elements(NUM_TRANSACTIONS));
    group.measurement_time(Duration::from_secs(20));
    group.sample_size(50);

    let store = filled_store();
    let transactions = store.list(None);

    group.bench_function("list_10K_transactions", |b| {
        b.iter(|| black_box(store.list(None)));
    });

    group.bench_function("list_filtered_10K_transactions", |b| {
        b.iter(|| black_box(store.list(Some("Salary"))));
    });

    group.bench_function("summarize_10K_transactions", |b| {
        b.iter(|| black_box(summarize(&transactions)));
    });

    group.bench_function("reload_10K_transactions", |b| {
        let mut storage = MemoryStorage::new();
        storage
            .set(STORAGE_KEY, &serde_json::to_string(&transactions).unwrap())
            .unwrap();
        b.iter_batched(
            || storage.clone(),
            |storage| black_box(TransactionStore::open(storage)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("add_10K_transactions_without_persistence", |b| {
        b.iter(|| black_box(filled_store().len()));
    });

    group.finish();
}

criterion_group!(benches, store_operations);
criterion_main!(benches);

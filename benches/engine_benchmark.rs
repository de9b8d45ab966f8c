use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flight_reservations::{search, EngineConfig, OrderedSequence, Reservation, ReservationEngine};
use rand::{seq::SliceRandom, thread_rng, Rng};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn random_bookings(count: usize) -> Vec<Reservation> {
    let mut rng = thread_rng();
    let flights = ["AA100", "BA200", "DL300", "UA900", "LH400"];

    (0..count)
        .map(|i| {
            Reservation::new(
                format!("passenger{}", i),
                *flights.choose(&mut rng).unwrap(),
                format!("{}{}", rng.gen_range(1..40), (b'A' + rng.gen_range(0..6)) as char),
                base() + Duration::minutes(rng.gen_range(0..60 * 24 * 365)),
                i as i64,
            )
        })
        .collect()
}

// In-memory list operations, no file involved
pub fn sequence_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_sequence");

    for size in [100usize, 1_000, 5_000].iter() {
        let bookings = random_bookings(*size);

        group.bench_with_input(BenchmarkId::new("insert", size), &bookings, |b, bookings| {
            b.iter(|| {
                let mut seq = OrderedSequence::new();
                for record in bookings {
                    seq.insert(record.clone());
                }
                black_box(seq.len())
            });
        });

        let mut seq = OrderedSequence::new();
        for record in &bookings {
            seq.insert(record.clone());
        }

        group.bench_with_input(BenchmarkId::new("merge_sort", size), &seq, |b, seq| {
            b.iter(|| {
                let mut copy = seq.clone();
                copy.sort_by_date();
                black_box(copy.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("find_by_flight", size), &seq, |b, seq| {
            b.iter(|| black_box(search::find_by_flight(seq, "DL300").map(|r| r.id)));
        });
    }

    group.finish();
}

// Inserts with the full file rewrite after each one
pub fn engine_benchmark(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let bookings = random_bookings(200);

    c.bench_function("engine_insert_and_persist_200", |b| {
        b.iter(|| {
            let path = dir.path().join("bench.txt");
            let _ = std::fs::remove_file(&path);
            let mut engine = ReservationEngine::open(EngineConfig::with_store_path(&path));
            for record in &bookings {
                let _ = engine.insert(record.clone());
            }
            black_box(engine.len())
        })
    });
}

criterion_group!(benches, sequence_benchmark, engine_benchmark);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use finance_buddy::{AccountId, Amount, Engine};

/// Build an engine with `accounts` funded accounts.
fn funded_engine(accounts: u32) -> (Engine, Vec<AccountId>) {
    let mut engine = Engine::new();
    let ids = (0..accounts)
        .map(|i| engine.create_account(&format!("account-{i}"), Amount::from_scaled(1_000_000)))
        .collect();
    (engine, ids)
}

fn bench_deposits(c: &mut Criterion) {
    let mut group = c.benchmark_group("deposits");

    for count in [10_000u32, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let (mut engine, ids) = funded_engine(1);
                for _ in 0..count {
                    let _ = black_box(engine.deposit(ids[0], Amount::from_scaled(100)));
                }
                engine
            });
        });
    }

    group.finish();
}

fn bench_mixed_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");

    // Pattern per round: deposit 100, withdraw 30, transfer 50 to the next
    // account. Withdrawals and transfers never outrun the deposits.
    for (accounts, rounds) in [(100u32, 1_000u32), (1_000, 100)] {
        let label = format!("{accounts}a_{rounds}r");
        group.bench_with_input(
            BenchmarkId::from_parameter(&label),
            &(accounts, rounds),
            |b, &(accounts, rounds)| {
                b.iter(|| {
                    let (mut engine, ids) = funded_engine(accounts);
                    for round in 0..rounds {
                        for (i, &id) in ids.iter().enumerate() {
                            let _ = black_box(engine.deposit(id, Amount::from_scaled(10_000)));
                            let _ = black_box(engine.withdraw(id, Amount::from_scaled(3_000)));
                            let to = ids[(i + 1 + round as usize) % ids.len()];
                            if to != id {
                                let _ =
                                    black_box(engine.transfer(id, to, Amount::from_scaled(5_000)));
                            }
                        }
                    }
                    engine
                });
            },
        );
    }

    group.finish();
}

fn bench_apply_then_unwind(c: &mut Criterion) {
    let mut group = c.benchmark_group("unwind");

    // Apply a deposit/withdraw churn and then undo the full journal.
    for count in [10_000u32, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let (mut engine, ids) = funded_engine(1);
                for i in 0..count {
                    if i % 2 == 0 {
                        let _ = engine.deposit(ids[0], Amount::from_scaled(100));
                    } else {
                        let _ = engine.withdraw(ids[0], Amount::from_scaled(100));
                    }
                }
                while black_box(engine.undo_last()).is_ok() {}
                engine
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_deposits, bench_mixed_operations, bench_apply_then_unwind);
criterion_main!(benches);

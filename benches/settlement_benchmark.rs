use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use tokio::runtime::Runtime;

use cryptozen_api::domains::trade::ledger::{LedgerStore, MemoryLedger};
use cryptozen_api::domains::trade::models::TradeSide;
use cryptozen_api::domains::trade::services::{SettlementRequest, SettlementService};

const TRADE_BATCHES: [usize; 3] = [1_000, 5_000, 10_000];
const NUM_ACCOUNTS: usize = 16;

fn setup(accounts: usize) -> (Vec<u64>, SettlementService) {
    let ledger = MemoryLedger::new();
    let ids = (0..accounts)
        .map(|_| ledger.create_account(Decimal::new(1_000_000_000, 0)))
        .collect();
    let store: Arc<dyn LedgerStore> = Arc::new(ledger);
    (ids, SettlementService::new(store, 3))
}

fn build_request(account_id: u64, idx: usize) -> SettlementRequest {
    SettlementRequest {
        account_id,
        symbol: "btc".to_string(),
        side: if idx % 2 == 0 { TradeSide::Buy } else { TradeSide::Sell },
        amount: Decimal::new(5, 1), // 0.5
        price_at_trade: Decimal::new(100_000 + (idx as i64 % 50) * 10, 2),
    }
}

/// 한 계정에 순차 정산
fn bench_sequential_settlement(c: &mut Criterion) {
    let rt = Runtime::new().expect("Failed to create Tokio runtime");
    let mut group = c.benchmark_group("sequential_settlement");

    for &trade_count in TRADE_BATCHES.iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(trade_count),
            &trade_count,
            |b, &count| {
                b.iter(|| {
                    rt.block_on(async {
                        let (ids, service) = setup(1);

                        let start = Instant::now();
                        settle_sequential(&service, ids[0], count)
                            .await
                            .expect("settlement failed");
                        black_box(start.elapsed())
                    })
                });
            },
        );
    }

    group.finish();
}

/// 여러 계정에 동시 정산 (계정별 직렬화, 계정 간 병렬)
fn bench_concurrent_settlement(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime");
    let mut group = c.benchmark_group("concurrent_settlement");

    for &trade_count in TRADE_BATCHES.iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(trade_count),
            &trade_count,
            |b, &count| {
                b.iter(|| {
                    rt.block_on(async {
                        let (ids, service) = setup(NUM_ACCOUNTS);

                        let start = Instant::now();
                        settle_concurrent(&service, &ids, count)
                            .await
                            .expect("settlement failed");
                        black_box(start.elapsed())
                    })
                });
            },
        );
    }

    group.finish();
}

async fn settle_sequential(service: &SettlementService, account_id: u64, total: usize) -> Result<()> {
    for idx in 0..total {
        service.settle(build_request(account_id, idx)).await?;
    }
    Ok(())
}

async fn settle_concurrent(service: &SettlementService, ids: &[u64], total: usize) -> Result<()> {
    let handles: Vec<_> = (0..total)
        .map(|idx| {
            let service = service.clone();
            let account_id = ids[idx % ids.len()];
            tokio::spawn(async move { service.settle(build_request(account_id, idx)).await })
        })
        .collect();

    for handle in handles {
        handle.await??;
    }
    Ok(())
}

criterion_group!(benches, bench_sequential_settlement, bench_concurrent_settlement);
criterion_main!(benches);

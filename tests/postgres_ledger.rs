// =====================================================
// PostgreSQL 원장 테스트
// =====================================================
// 목적: 실제 DB 트랜잭션 / 행 잠금으로 정산이 원자적, 직렬화되는지 검증
//
// 실행 방법:
//   TEST_DATABASE_URL=postgresql://... cargo test --test postgres_ledger -- --ignored
// =====================================================

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use chrono::Utc;
use common::*;
use rust_decimal::Decimal;
use cryptozen_api::config::DatabaseConfig;
use cryptozen_api::domains::auth::models::{UserCreate, UserRole};
use cryptozen_api::domains::trade::ledger::{LedgerStore, PgLedger};
use cryptozen_api::domains::trade::models::{TradeQuery, TradeSide};
use cryptozen_api::domains::trade::services::{SettlementRequest, SettlementService, TradeCharges};
use cryptozen_api::shared::database::{Database, UserRepository};
use cryptozen_api::shared::errors::SettlementError;

static NEXT_USER: AtomicU64 = AtomicU64::new(0);

struct PgFixture {
    db: Database,
    ledger: PgLedger,
    service: SettlementService,
    accounts: Vec<u64>,
}

impl PgFixture {
    async fn new() -> Self {
        let db = Database::new(&DatabaseConfig {
            url: test_database_url(),
            max_connections: 20,
        })
        .await
        .expect("connect to TEST_DATABASE_URL");
        db.initialize().await.expect("migrations");

        let ledger = PgLedger::new(db.clone());
        let store: Arc<dyn LedgerStore> = Arc::new(ledger.clone());
        let service = SettlementService::new(store, 3);

        Self {
            db,
            ledger,
            service,
            accounts: Vec::new(),
        }
    }

    async fn create_account(&mut self, balance: Decimal) -> u64 {
        let n = NEXT_USER.fetch_add(1, Ordering::Relaxed);
        let tag = format!("pgledger_{}_{}", Utc::now().timestamp_nanos_opt().unwrap_or_default(), n);

        let user = UserRepository::new(self.db.pool().clone())
            .create_user(&UserCreate {
                username: tag.clone(),
                email: format!("{}@example.com", tag),
                password_hash: "not-a-real-hash".to_string(),
                name: tag,
                role: UserRole::User,
                balance,
            })
            .await
            .expect("create user");

        self.accounts.push(user.id);
        user.id
    }

    async fn balance(&self, account_id: u64) -> Decimal {
        self.ledger
            .find_account(account_id)
            .await
            .unwrap()
            .expect("account exists")
            .balance
    }

    async fn cleanup(self) {
        for id in &self.accounts {
            sqlx::query("DELETE FROM trades WHERE account_id = $1")
                .bind(*id as i64)
                .execute(self.db.pool())
                .await
                .unwrap();
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(*id as i64)
                .execute(self.db.pool())
                .await
                .unwrap();
        }
    }
}

#[tokio::test]
#[ignore]
async fn settles_buy_and_sell_against_postgres() {
    let mut fx = PgFixture::new().await;
    let id = fx.create_account(dec("1000")).await;

    let bought = fx.service.settle(buy(id, "btc", "2", "100")).await.unwrap();
    assert_eq!(bought.fee, dec("0.2"));
    assert_eq!(bought.side, TradeSide::Buy);
    assert_eq!(fx.balance(id).await, dec("799.8"));

    let sold = fx.service.settle(sell(id, "btc", "1", "50")).await.unwrap();
    assert_eq!(sold.fee, dec("0.05"));
    assert_eq!(fx.balance(id).await, dec("849.8"));

    let trades = fx
        .ledger
        .list_trades(&TradeQuery {
            account_id: id,
            symbol: Some("btc".to_string()),
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(trades.len(), 2);
    assert!(trades.iter().any(|t| t.id == bought.id));
    assert!(trades.iter().any(|t| t.id == sold.id));

    fx.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn rejected_settlement_leaves_no_trace() {
    let mut fx = PgFixture::new().await;
    let id = fx.create_account(dec("10")).await;

    let err = fx.service.settle(buy(id, "eth", "1", "100")).await.unwrap_err();
    assert_eq!(err, SettlementError::InsufficientBalance);

    let err = fx.service.settle(buy(i64::MAX as u64, "eth", "1", "1")).await.unwrap_err();
    assert!(matches!(err, SettlementError::AccountNotFound { .. }));

    assert_eq!(fx.balance(id).await, dec("10"));
    let trades = fx
        .ledger
        .list_trades(&TradeQuery {
            account_id: id,
            symbol: None,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert!(trades.is_empty());

    fx.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn stored_amounts_match_computed_charges_exactly() {
    let mut fx = PgFixture::new().await;

    // (side, amount, price, starting balance): 10자리 초과 소수, 20자리 초과 정수부
    let cases = [
        (TradeSide::Buy, "0.00000000001", "1", "1000"),
        (TradeSide::Buy, "0.123456789", "1.1", "1000"),
        (TradeSide::Sell, "0.000000000000000001", "0.0000003", "0"),
        (TradeSide::Sell, "123456789012345678901.5", "2", "0"),
        (TradeSide::Buy, "12345678901234567890123", "1", "1000000000000000000000000"),
    ];

    for (side, amount, price, balance) in cases {
        let id = fx.create_account(dec(balance)).await;
        let request = SettlementRequest {
            account_id: id,
            symbol: "btc".to_string(),
            side,
            amount: dec(amount),
            price_at_trade: dec(price),
        };
        let charges = TradeCharges::compute(request.amount, request.price_at_trade).unwrap();
        let before = fx.balance(id).await;

        let trade = fx.service.settle(request).await.unwrap();

        let expected = match side {
            TradeSide::Buy => before - charges.total_cost,
            TradeSide::Sell => before + charges.sell_credit(),
        };
        assert_eq!(fx.balance(id).await, expected, "{side} {amount} @ {price}");
        assert_eq!(trade.fee, charges.fee, "{side} {amount} @ {price}");
        assert_eq!(trade.amount, dec(amount));
        assert_eq!(trade.price_at_trade, dec(price));

        let stored = fx
            .ledger
            .list_trades(&TradeQuery {
                account_id: id,
                symbol: None,
                limit: 1,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(stored[0].fee, charges.fee, "{side} {amount} @ {price}");
        assert_eq!(stored[0].amount, dec(amount));
    }

    fx.cleanup().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn racing_buys_serialize_on_the_account_row() {
    const N: usize = 16;
    let mut fx = PgFixture::new().await;
    let id = fx.create_account(dec("100.1")).await;

    let handles: Vec<_> = (0..N)
        .map(|_| {
            let service = fx.service.clone();
            tokio::spawn(async move { service.settle(buy(id, "btc", "1", "100")).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(SettlementError::InsufficientBalance) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(fx.balance(id).await, Decimal::ZERO);

    fx.cleanup().await;
}

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use crate::domains::trade::models::{Account, Trade, TradeCreate, TradeQuery};
use crate::shared::database::{AccountRepository, Database, TradeRepository};
use crate::shared::errors::StoreError;
use super::{LedgerScope, LedgerStore};

/// PostgreSQL 원장
/// PostgreSQL-backed ledger
///
/// 동시성:
/// - lock_account 가 SELECT ... FOR UPDATE 로 계정 행을 잠금
/// - 같은 계정에 대한 정산은 DB 가 직렬화, 다른 계정은 병렬 실행
/// - 직렬화 실패 / 데드락(40001, 40P01)은 StoreError::Conflict 로 변환
#[derive(Clone)]
pub struct PgLedger {
    db: Database,
}

impl PgLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStore for PgLedger {
    async fn begin(&self) -> Result<Box<dyn LedgerScope>, StoreError> {
        let tx = self.db.pool().begin().await?;
        Ok(Box::new(PgLedgerScope { tx }))
    }

    async fn find_account(&self, account_id: u64) -> Result<Option<Account>, StoreError> {
        AccountRepository::new(self.db.pool().clone())
            .get_by_id(account_id)
            .await
    }

    async fn list_trades(&self, query: &TradeQuery) -> Result<Vec<Trade>, StoreError> {
        TradeRepository::new(self.db.pool().clone())
            .get_by_account(query)
            .await
    }
}

/// PostgreSQL 트랜잭션 기반 scope
/// Scope backed by one database transaction
///
/// commit/abort 없이 drop 되면 sqlx 가 롤백합니다.
pub struct PgLedgerScope {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LedgerScope for PgLedgerScope {
    async fn lock_account(&mut self, account_id: u64) -> Result<Option<Account>, StoreError> {
        AccountRepository::lock_for_update(&mut *self.tx, account_id).await
    }

    async fn update_balance(&mut self, account_id: u64, balance: Decimal) -> Result<(), StoreError> {
        AccountRepository::set_balance(&mut *self.tx, account_id, balance).await
    }

    async fn insert_trade(&mut self, trade: &TradeCreate) -> Result<Trade, StoreError> {
        TradeRepository::insert(&mut *self.tx, trade).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn abort(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

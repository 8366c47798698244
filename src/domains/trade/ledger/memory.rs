use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use crate::domains::trade::models::{Account, Trade, TradeCreate, TradeQuery};
use crate::shared::errors::StoreError;
use crate::shared::utils::IdGenerator;
use super::{LedgerScope, LedgerStore};

/// 장애 주입 지점 (테스트/벤치마크용)
/// Points where a one-shot failure can be injected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    LockAccount,
    UpdateBalance,
    InsertTrade,
    Commit,
    Abort,
    /// find_account / list_trades
    Query,
}

/// 메모리 원장
/// In-process ledger
///
/// 역할:
/// - 테스트 / 벤치마크에서 PostgreSQL 없이 정산을 실행
/// - 계정마다 비동기 Mutex 하나: scope 가 살아있는 동안 잠금 유지 (SELECT ... FOR UPDATE 와 동일한 효과)
/// - 변경은 scope 안에 모아두었다가 commit 시에만 반영
#[derive(Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<MemoryLedgerInner>,
}

#[derive(Default)]
struct MemoryLedgerInner {
    /// 계정 ID → 잔고 (계정별 잠금)
    accounts: Mutex<HashMap<u64, Arc<AsyncMutex<Decimal>>>>,
    /// 커밋된 거래 (append-only)
    trades: Mutex<Vec<Trade>>,
    account_ids: IdGenerator,
    trade_ids: IdGenerator,
    /// 1회성 장애 주입
    fail_points: Mutex<HashMap<FailPoint, StoreError>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 계정 생성
    /// Create an account with an opening balance, returns its id
    pub fn create_account(&self, balance: Decimal) -> u64 {
        let id = self.inner.account_ids.next();
        self.inner
            .accounts
            .lock()
            .insert(id, Arc::new(AsyncMutex::new(balance)));
        id
    }

    /// 커밋된 잔고 조회 (진행 중인 scope 가 있으면 끝날 때까지 대기)
    /// Committed balance of an account
    pub async fn balance(&self, account_id: u64) -> Option<Decimal> {
        let cell = self.account_cell(account_id)?;
        let balance = *cell.lock().await;
        Some(balance)
    }

    /// 커밋된 모든 거래 (생성순)
    /// Every committed trade in insertion order
    pub fn trades(&self) -> Vec<Trade> {
        self.inner.trades.lock().clone()
    }

    pub fn trade_count(&self) -> usize {
        self.inner.trades.lock().len()
    }

    /// 다음 번 `point` 도달 시 `error` 를 한 번 반환
    /// Make the next operation at `point` fail once with `error`
    pub fn fail_once(&self, point: FailPoint, error: StoreError) {
        self.inner.fail_points.lock().insert(point, error);
    }

    fn account_cell(&self, account_id: u64) -> Option<Arc<AsyncMutex<Decimal>>> {
        self.inner.accounts.lock().get(&account_id).cloned()
    }

    fn trip(&self, point: FailPoint) -> Result<(), StoreError> {
        match self.inner.fail_points.lock().remove(&point) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn begin(&self) -> Result<Box<dyn LedgerScope>, StoreError> {
        Ok(Box::new(MemoryLedgerScope {
            ledger: self.clone(),
            locked: None,
            staged_balance: None,
            staged_trades: Vec::new(),
        }))
    }

    async fn find_account(&self, account_id: u64) -> Result<Option<Account>, StoreError> {
        self.trip(FailPoint::Query)?;
        Ok(self
            .balance(account_id)
            .await
            .map(|balance| Account { id: account_id, balance }))
    }

    async fn list_trades(&self, query: &TradeQuery) -> Result<Vec<Trade>, StoreError> {
        self.trip(FailPoint::Query)?;
        let mut trades: Vec<Trade> = self
            .inner
            .trades
            .lock()
            .iter()
            .filter(|t| t.account_id == query.account_id)
            .filter(|t| query.symbol.as_deref().is_none_or(|s| t.symbol == s))
            .cloned()
            .collect();

        // 최신순
        trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));

        Ok(trades
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }
}

/// 메모리 원장의 원자적 범위
/// Atomic scope over a MemoryLedger
pub struct MemoryLedgerScope {
    ledger: MemoryLedger,
    /// 잠근 계정 (scope 가 끝날 때까지 유지)
    locked: Option<(u64, OwnedMutexGuard<Decimal>)>,
    staged_balance: Option<Decimal>,
    staged_trades: Vec<Trade>,
}

impl MemoryLedgerScope {
    fn ensure_locked(&self, account_id: u64) -> Result<(), StoreError> {
        match &self.locked {
            Some((id, _)) if *id == account_id => Ok(()),
            _ => Err(StoreError::Unavailable(format!(
                "account {} is not locked in this scope",
                account_id
            ))),
        }
    }
}

#[async_trait]
impl LedgerScope for MemoryLedgerScope {
    async fn lock_account(&mut self, account_id: u64) -> Result<Option<Account>, StoreError> {
        self.ledger.trip(FailPoint::LockAccount)?;

        if let Some((id, guard)) = &self.locked {
            if *id != account_id {
                return Err(StoreError::Unavailable(
                    "scope already holds another account".to_string(),
                ));
            }
            let balance = self.staged_balance.unwrap_or(**guard);
            return Ok(Some(Account { id: account_id, balance }));
        }

        let cell = match self.ledger.account_cell(account_id) {
            Some(cell) => cell,
            None => return Ok(None),
        };

        let guard = cell.lock_owned().await;
        let balance = *guard;
        self.locked = Some((account_id, guard));

        Ok(Some(Account { id: account_id, balance }))
    }

    async fn update_balance(&mut self, account_id: u64, balance: Decimal) -> Result<(), StoreError> {
        self.ledger.trip(FailPoint::UpdateBalance)?;
        self.ensure_locked(account_id)?;

        // users.balance CHECK (balance >= 0) 과 동일
        if balance < Decimal::ZERO {
            return Err(StoreError::Constraint("balance must not be negative".to_string()));
        }

        self.staged_balance = Some(balance);
        Ok(())
    }

    async fn insert_trade(&mut self, trade: &TradeCreate) -> Result<Trade, StoreError> {
        self.ledger.trip(FailPoint::InsertTrade)?;
        // trades.account_id 외래 키와 동일: 잠근 계정의 거래만 기록
        self.ensure_locked(trade.account_id)?;

        let trade = Trade {
            id: self.ledger.inner.trade_ids.next(),
            account_id: trade.account_id,
            symbol: trade.symbol.clone(),
            side: trade.side,
            amount: trade.amount,
            price_at_trade: trade.price_at_trade,
            fee: trade.fee,
            timestamp: Utc::now(),
        };
        self.staged_trades.push(trade.clone());

        Ok(trade)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.ledger.trip(FailPoint::Commit)?;

        let MemoryLedgerScope {
            ledger,
            locked,
            staged_balance,
            staged_trades,
        } = *self;

        // 잠금을 쥔 상태에서 거래와 잔고를 함께 반영
        ledger.inner.trades.lock().extend(staged_trades);

        if let (Some((_, mut guard)), Some(balance)) = (locked, staged_balance) {
            *guard = balance;
        }

        Ok(())
    }

    async fn abort(self: Box<Self>) -> Result<(), StoreError> {
        // 실패하더라도 drop 시 변경은 폐기됨
        self.ledger.trip(FailPoint::Abort)
    }
}

// =====================================================
// Ledger (원장 저장소 추상화)
// =====================================================
// 역할: 계정 잔고 변경과 거래 기록을 하나의 원자적 범위(scope)로 묶음
//
// 처리 흐름:
// 1. begin()            → LedgerScope 생성 (트랜잭션 시작)
// 2. lock_account()     → 계정 조회 + 같은 계정에 대한 다른 scope 차단
// 3. update_balance()   → 새 잔고 기록 (커밋 전까지 외부에 보이지 않음)
// 4. insert_trade()     → 거래 기록 (커밋 전까지 외부에 보이지 않음)
// 5. commit() / abort() → 전부 반영 또는 전부 폐기
//
// 커밋되지 않은 scope 를 drop 하면 abort 와 동일하게 폐기됩니다.
// =====================================================

pub mod memory;
pub mod postgres;

pub use memory::*;
pub use postgres::*;

use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::domains::trade::models::{Account, Trade, TradeCreate, TradeQuery};
use crate::shared::errors::StoreError;

/// 원장 저장소
/// Ledger store: hands out atomic scopes and serves read-only queries
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// 새 원자적 범위 시작
    /// Begin a new atomic scope
    async fn begin(&self) -> Result<Box<dyn LedgerScope>, StoreError>;

    /// 계정 조회 (커밋된 상태만 보임)
    /// Read committed account state
    async fn find_account(&self, account_id: u64) -> Result<Option<Account>, StoreError>;

    /// 계정의 거래 목록 조회 (최신순)
    /// List an account's trades, newest first
    async fn list_trades(&self, query: &TradeQuery) -> Result<Vec<Trade>, StoreError>;
}

/// 원자적 범위 (2단계 커밋 단위)
/// One atomic unit of work over the account and trade collections
///
/// 한 scope 는 최대 한 개의 계정만 잠급니다.
#[async_trait]
pub trait LedgerScope: Send {
    /// 계정을 잠그고 현재 잔고를 읽음. 같은 계정을 잠근 다른 scope 는 커밋/폐기될 때까지 대기
    /// Load the account and hold it exclusively until commit or abort
    async fn lock_account(&mut self, account_id: u64) -> Result<Option<Account>, StoreError>;

    /// 잠근 계정의 새 잔고 기록
    /// Stage the account's new balance
    async fn update_balance(&mut self, account_id: u64, balance: Decimal) -> Result<(), StoreError>;

    /// 거래 기록 추가 (id, timestamp 는 저장소가 부여)
    /// Stage a trade insertion; the store assigns id and timestamp
    async fn insert_trade(&mut self, trade: &TradeCreate) -> Result<Trade, StoreError>;

    /// 모든 변경 반영
    /// Apply every staged write at once
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// 모든 변경 폐기
    /// Discard every staged write
    async fn abort(self: Box<Self>) -> Result<(), StoreError>;
}

use std::sync::Arc;
use anyhow::Result;
use crate::config::AppConfig;
use crate::shared::database::Database;
use crate::domains::auth::services::state::AuthState;
use crate::domains::trade::ledger::{LedgerStore, PgLedger};
use crate::domains::trade::services::state::TradeState;
use crate::domains::market::services::state::MarketState;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 각 도메인의 State를 조합하여 전체 애플리케이션 상태를 관리
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// 데이터베이스 연결 (공유)
    /// Database connection (shared)
    pub db: Database,
    pub auth_state: AuthState,
    pub trade_state: TradeState,
    pub market_state: MarketState,
}

impl AppState {
    /// PostgreSQL 원장으로 AppState 생성
    /// Create AppState backed by the PostgreSQL ledger
    pub fn new(config: AppConfig, db: Database) -> Result<Self> {
        let ledger: Arc<dyn LedgerStore> = Arc::new(PgLedger::new(db.clone()));
        Self::with_ledger(config, db, ledger)
    }

    /// 원장 저장소를 지정해서 생성 (테스트에서 MemoryLedger 사용)
    /// Create AppState over the given ledger store
    pub fn with_ledger(config: AppConfig, db: Database, ledger: Arc<dyn LedgerStore>) -> Result<Self> {
        let auth_state = AuthState::new(db.clone(), &config);
        let trade_state = TradeState::new(ledger, &config.settlement);
        let market_state = MarketState::new(&config.market)?;

        Ok(Self {
            config: Arc::new(config),
            db,
            auth_state,
            trade_state,
            market_state,
        })
    }
}

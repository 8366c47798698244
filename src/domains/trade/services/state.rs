// Trade domain state
// 거래 도메인 상태
use std::sync::Arc;
use crate::config::SettlementConfig;
use crate::domains::trade::ledger::LedgerStore;
use crate::domains::trade::services::{SettlementService, TradeService};

/// Trade domain state
/// 거래 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct TradeState {
    pub settlement_service: SettlementService,
    pub trade_service: TradeService,
}

impl TradeState {
    /// TradeState 생성 (원장 저장소 필요)
    /// Create TradeState over a ledger store
    pub fn new(ledger: Arc<dyn LedgerStore>, config: &SettlementConfig) -> Self {
        Self {
            settlement_service: SettlementService::new(ledger.clone(), config.max_attempts),
            trade_service: TradeService::new(ledger),
        }
    }
}

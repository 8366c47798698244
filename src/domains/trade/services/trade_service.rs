use std::sync::Arc;
use crate::domains::trade::ledger::LedgerStore;
use crate::domains::trade::models::{Account, Trade, TradeQuery};
use crate::shared::errors::StoreError;

/// 기본 조회 개수
pub const DEFAULT_TRADES_LIMIT: i64 = 100;
/// 최대 조회 개수
pub const MAX_TRADES_LIMIT: i64 = 1000;

/// 거래 내역 / 계정 조회 서비스
/// Trade Service
///
/// 역할:
/// - 내 거래 내역 조회 (심볼 필터, 페이지네이션)
/// - 내 계정 잔고 조회
///
/// 특징:
/// - 읽기 전용 서비스 (조회만 담당)
/// - 잔고 변경과 거래 생성은 SettlementService 가 담당
#[derive(Clone)]
pub struct TradeService {
    ledger: Arc<dyn LedgerStore>,
}

impl TradeService {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// 사용자별 거래 내역 조회
    /// Get my trades
    ///
    /// # Arguments
    /// * `account_id` - 계정 ID
    /// * `symbol` - 자산 심볼 필터 (None 이면 전체)
    /// * `limit` - 최대 조회 개수 (기본: 100, 최대: 1000)
    /// * `offset` - 페이지네이션 오프셋 (기본: 0)
    ///
    /// # Returns
    /// 거래 목록 (최신순)
    pub async fn get_my_trades(
        &self,
        account_id: u64,
        symbol: Option<String>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Trade>, StoreError> {
        let limit = limit.unwrap_or(DEFAULT_TRADES_LIMIT).clamp(1, MAX_TRADES_LIMIT);
        let offset = offset.unwrap_or(0).max(0);
        let symbol = symbol
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        self.ledger
            .list_trades(&TradeQuery {
                account_id,
                symbol,
                limit,
                offset,
            })
            .await
    }

    /// 계정 조회 (커밋된 잔고)
    /// Get account
    pub async fn get_account(&self, account_id: u64) -> Result<Option<Account>, StoreError> {
        self.ledger.find_account(account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::trade::ledger::MemoryLedger;
    use crate::domains::trade::services::{SettlementRequest, SettlementService};
    use crate::domains::trade::models::TradeSide;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn my_trades_filters_by_symbol_and_pages() {
        let ledger = MemoryLedger::new();
        let id = ledger.create_account(Decimal::new(10_000, 0));
        let other = ledger.create_account(Decimal::new(10_000, 0));
        let store: Arc<dyn LedgerStore> = Arc::new(ledger.clone());
        let settlement = SettlementService::new(store.clone(), 3);

        for (account_id, symbol) in [(id, "btc"), (id, "eth"), (id, "btc"), (other, "btc")] {
            settlement
                .settle(SettlementRequest {
                    account_id,
                    symbol: symbol.to_string(),
                    side: TradeSide::Buy,
                    amount: Decimal::ONE,
                    price_at_trade: Decimal::TEN,
                })
                .await
                .unwrap();
        }

        let service = TradeService::new(store);

        let all = service.get_my_trades(id, None, None, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|t| t.account_id == id));
        assert!(all.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        let btc = service.get_my_trades(id, Some("btc".to_string()), None, None).await.unwrap();
        assert_eq!(btc.len(), 2);

        let page = service.get_my_trades(id, None, Some(1), Some(1)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, all[1].id);
    }

    #[tokio::test]
    async fn missing_account_is_none() {
        let service = TradeService::new(Arc::new(MemoryLedger::new()));
        assert!(service.get_account(42).await.unwrap().is_none());
    }
}

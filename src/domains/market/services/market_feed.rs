use std::sync::Arc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use crate::domains::market::models::{MarketTicker, MarketUpdate};
use crate::domains::market::services::PriceFeed;

/// 시세 스냅샷 + 브로드캐스트 채널
/// Latest market snapshot and its broadcast channel
///
/// 역할:
/// - MarketPoller 가 publish 한 최신 시세 보관
/// - WebSocket 구독자에게 market:update 전달 (구독자가 없어도 에러 아님)
#[derive(Clone)]
pub struct MarketFeed {
    tx: broadcast::Sender<MarketUpdate>,
    snapshot: Arc<RwLock<Vec<MarketTicker>>>,
}

impl MarketFeed {
    pub fn new(channel_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// 스냅샷 교체 후 브로드캐스트
    /// Replace the snapshot and notify subscribers; returns the receiver count
    pub fn publish(&self, tickers: Vec<MarketTicker>) -> usize {
        *self.snapshot.write() = tickers.clone();
        // 구독자가 없으면 send 가 Err 를 돌려줌 (무시)
        self.tx.send(MarketUpdate::new(tickers)).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MarketUpdate> {
        self.tx.subscribe()
    }

    /// 최신 시세 (아직 없으면 빈 목록)
    pub fn latest(&self) -> Vec<MarketTicker> {
        self.snapshot.read().clone()
    }
}

impl PriceFeed for MarketFeed {
    fn spot_price(&self, symbol: &str) -> Option<Decimal> {
        let symbol = symbol.trim();
        self.snapshot
            .read()
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
            .and_then(|t| t.current_price)
            .and_then(|price| Decimal::try_from(price).ok())
    }
}

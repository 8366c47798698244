// Market domain state
// 시세 도메인 상태
use std::sync::Arc;
use anyhow::Result;
use crate::config::MarketConfig;
use crate::domains::market::services::MarketFeed;
use crate::shared::clients::CoinGeckoClient;

/// Market domain state
/// 시세 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct MarketState {
    pub client: Arc<CoinGeckoClient>,
    pub feed: MarketFeed,
}

impl MarketState {
    pub fn new(config: &MarketConfig) -> Result<Self> {
        Ok(Self {
            client: Arc::new(CoinGeckoClient::new(config)?),
            feed: MarketFeed::new(config.channel_capacity),
        })
    }
}

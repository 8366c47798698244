use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use crate::domains::market::models::MarketTicker;
use crate::domains::market::services::MarketFeed;
use crate::shared::clients::CoinGeckoClient;

/// 시세 공급원
/// Source of top-market tickers
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_top_markets(&self) -> anyhow::Result<Vec<MarketTicker>>;
}

#[async_trait]
impl MarketSource for CoinGeckoClient {
    async fn fetch_top_markets(&self) -> anyhow::Result<Vec<MarketTicker>> {
        CoinGeckoClient::fetch_top_markets(self).await
    }
}

/// 시세 폴러
/// Market Poller
///
/// 역할:
/// - 주기적으로 상위 시세를 조회해서 MarketFeed 에 publish
///
/// 처리 흐름:
/// 1. start() 즉시 첫 조회
/// 2. 이후 poll_interval 마다 조회
/// 3. 조회 실패는 로그만 남기고 계속
/// 4. stop() 시 취소 후 태스크 종료 대기
pub struct MarketPoller {
    source: Arc<dyn MarketSource>,
    feed: MarketFeed,
    poll_interval: Duration,
}

impl MarketPoller {
    pub fn new(source: Arc<dyn MarketSource>, feed: MarketFeed, poll_interval: Duration) -> Self {
        Self {
            source,
            feed,
            poll_interval,
        }
    }

    /// 백그라운드 태스크 시작
    /// Spawn the polling task
    pub fn start(self) -> MarketPollerHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(interval_ms = self.poll_interval.as_millis() as u64, "market poller started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    // interval 의 첫 tick 은 즉시 완료됨
                    _ = ticker.tick() => self.poll_once().await,
                }
            }

            info!("market poller stopped");
        });

        MarketPollerHandle { cancel, task }
    }

    async fn poll_once(&self) {
        match self.source.fetch_top_markets().await {
            Ok(tickers) => {
                let count = tickers.len();
                let receivers = self.feed.publish(tickers);
                info!(count, receivers, "market update emitted");
            }
            Err(e) => error!(error = %format!("{:#}", e), "market poll failed"),
        }
    }
}

/// 실행 중인 폴러 핸들
pub struct MarketPollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl MarketPollerHandle {
    /// 취소 후 종료 대기
    /// Cancel the poller and wait for it to exit
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            error!(error = %e, "market poller task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketSource for StubSource {
        async fn fetch_top_markets(&self) -> anyhow::Result<Vec<MarketTicker>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                anyhow::bail!("upstream unavailable");
            }
            Ok(vec![MarketTicker {
                id: "bitcoin".to_string(),
                symbol: "btc".to_string(),
                name: "Bitcoin".to_string(),
                image: None,
                current_price: Some(100.0),
                market_cap: None,
                price_change_percentage_24h: None,
                last_updated: None,
            }])
        }
    }

    #[tokio::test]
    async fn keeps_polling_after_errors_and_stops_on_cancel() {
        let source = Arc::new(StubSource { calls: AtomicUsize::new(0) });
        let feed = MarketFeed::new(4);
        let mut rx = feed.subscribe();

        let handle = MarketPoller::new(source.clone(), feed.clone(), Duration::from_millis(10)).start();

        // 첫 조회는 실패, 두 번째 조회 결과가 전달되어야 함
        let update = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.data[0].symbol, "btc");
        assert_eq!(feed.latest().len(), 1);

        handle.stop().await;
        let calls = source.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), calls);
    }
}

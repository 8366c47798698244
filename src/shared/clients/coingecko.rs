use crate::config::MarketConfig;
use crate::domains::market::models::MarketTicker;
use anyhow::{Context, Result};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

// CoinGecko API 클라이언트
// CoinGecko API client for market data
pub struct CoinGeckoClient {
    http_client: reqwest::Client,
    base_url: Url,
    vs_currency: String,
    per_page: u32,
}

impl CoinGeckoClient {
    // 클라이언트 생성
    // Create new CoinGecko client instance
    pub fn new(config: &MarketConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent("cryptozen-api/1.0")
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid market base url: {}", config.base_url))?;

        Ok(Self {
            http_client,
            base_url,
            vs_currency: config.vs_currency.clone(),
            per_page: config.per_page,
        })
    }

    /// 시가총액 상위 코인 시세
    /// Top markets by market cap
    pub async fn fetch_top_markets(&self) -> Result<Vec<MarketTicker>> {
        let url = self.endpoint(&["coins", "markets"])?;
        let per_page = self.per_page.to_string();

        self.get_json(
            url,
            &[
                ("vs_currency", self.vs_currency.as_str()),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ],
        )
        .await
    }

    /// 가격 이력 (그대로 전달)
    /// Historical market chart, passed through unchanged
    pub async fn market_chart(&self, id: &str, days: &str) -> Result<serde_json::Value> {
        let url = self.endpoint(&["coins", id, "market_chart"])?;
        self.get_json(url, &[("vs_currency", self.vs_currency.as_str()), ("days", days)])
            .await
    }

    /// OHLC 캔들 (그대로 전달)
    /// OHLC candles, passed through unchanged
    pub async fn ohlc(&self, id: &str, days: &str) -> Result<serde_json::Value> {
        let url = self.endpoint(&["coins", id, "ohlc"])?;
        self.get_json(url, &[("vs_currency", self.vs_currency.as_str()), ("days", days)])
            .await
    }

    // base_url 뒤에 경로 세그먼트 추가 (세그먼트는 인코딩됨)
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Market base url cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!(url = %url, "requesting CoinGecko API");

        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .context("Failed to send request to CoinGecko API")?;

        // HTTP 상태 코드 확인
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("CoinGecko API returned error: {} - {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse CoinGecko API response")
    }
}

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// 시세 갱신 이벤트 이름
pub const MARKET_UPDATE_EVENT: &str = "market:update";

/// 정규화된 시세 정보 (CoinGecko /coins/markets 항목 중 필요한 필드만)
/// Normalized market ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = MarketTicker)]
pub struct MarketTicker {
    #[schema(example = "bitcoin")]
    pub id: String,
    #[schema(example = "btc")]
    pub symbol: String,
    #[schema(example = "Bitcoin")]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    #[schema(example = 67000.5)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// 브로드캐스트 메시지
/// Message pushed to market stream subscribers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = MarketUpdate)]
pub struct MarketUpdate {
    /// 항상 "market:update"
    #[schema(example = "market:update")]
    pub event: String,
    pub data: Vec<MarketTicker>,
}

impl MarketUpdate {
    pub fn new(data: Vec<MarketTicker>) -> Self {
        Self {
            event: MARKET_UPDATE_EVENT.to_string(),
            data,
        }
    }
}

/// 차트 조회 쿼리 파라미터
/// Query parameters for chart proxies
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ChartQuery {
    /// 조회 기간 (일, 기본: "1")
    #[serde(default = "default_days")]
    pub days: String,
}

fn default_days() -> String {
    "1".to_string()
}

/// 시세 목록 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = MarketsResponse)]
pub struct MarketsResponse {
    pub markets: Vec<MarketTicker>,
}

/// 단일 심볼 가격 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = PriceResponse)]
pub struct PriceResponse {
    #[schema(example = "btc")]
    pub symbol: String,
    #[schema(value_type = String, example = "67000.5")]
    pub price: rust_decimal::Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_ignores_extra_upstream_fields() {
        let ticker: MarketTicker = serde_json::from_value(serde_json::json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://example.com/btc.png",
            "current_price": 67000.5,
            "market_cap": 1.0e12,
            "market_cap_rank": 1,
            "price_change_percentage_24h": -1.25,
            "last_updated": "2024-01-01T00:00:00.000Z",
            "sparkline_in_7d": null
        }))
        .unwrap();

        assert_eq!(ticker.symbol, "btc");
        assert_eq!(ticker.current_price, Some(67000.5));
    }

    #[test]
    fn update_carries_event_name() {
        let json = serde_json::to_value(MarketUpdate::new(Vec::new())).unwrap();
        assert_eq!(json["event"], "market:update");
        assert!(json["data"].as_array().unwrap().is_empty());
    }
}

use crate::domains::market::models::{ChartQuery, MarketsResponse, PriceResponse};
use crate::domains::market::services::PriceFeed;
use crate::shared::errors::MarketError;
use crate::shared::services::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

// =====================================================
// Market Handler
// =====================================================
// 역할: 시세 조회 + CoinGecko 차트 프록시
//
// 특징:
// - 읽기 전용
// - 외부 API 실패는 502
// =====================================================

/// 상위 시세 목록
/// Latest top markets
///
/// 폴러가 아직 한 번도 조회하지 못했으면 직접 조회합니다.
#[utoipa::path(
    get,
    path = "/api/market/markets",
    responses(
        (status = 200, description = "Markets retrieved successfully", body = MarketsResponse),
        (status = 502, description = "Upstream market API failed")
    ),
    tag = "Market"
)]
pub async fn get_markets(
    State(app_state): State<AppState>,
) -> Result<Json<MarketsResponse>, (StatusCode, Json<serde_json::Value>)> {
    let market_state = &app_state.market_state;

    let mut markets = market_state.feed.latest();
    if markets.is_empty() {
        markets = market_state
            .client
            .fetch_top_markets()
            .await
            .map_err(|e| -> (StatusCode, Json<serde_json::Value>) {
                MarketError::upstream("Failed to fetch markets", format!("{:#}", e)).into()
            })?;
    }

    Ok(Json(MarketsResponse { markets }))
}

/// 심볼 현재가 (최신 스냅샷 기준)
/// Spot price from the latest snapshot
#[utoipa::path(
    get,
    path = "/api/market/price/{symbol}",
    params(
        ("symbol" = String, Path, description = "Asset symbol, e.g. btc")
    ),
    responses(
        (status = 200, description = "Price found", body = PriceResponse),
        (status = 404, description = "No market data for symbol")
    ),
    tag = "Market"
)]
pub async fn get_price(
    State(app_state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<PriceResponse>, (StatusCode, Json<serde_json::Value>)> {
    let price = app_state
        .market_state
        .feed
        .spot_price(&symbol)
        .ok_or_else(|| -> (StatusCode, Json<serde_json::Value>) {
            MarketError::SymbolNotFound { symbol: symbol.clone() }.into()
        })?;

    Ok(Json(PriceResponse {
        symbol: symbol.to_lowercase(),
        price,
    }))
}

/// 가격 이력 프록시
/// Proxy for historical market_chart data
#[utoipa::path(
    get,
    path = "/api/market/market_chart/{id}",
    params(
        ("id" = String, Path, description = "CoinGecko coin id, e.g. bitcoin"),
        ChartQuery
    ),
    responses(
        (status = 200, description = "Upstream market_chart payload"),
        (status = 502, description = "Failed to fetch market chart")
    ),
    tag = "Market"
)]
pub async fn get_market_chart(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let chart = app_state
        .market_state
        .client
        .market_chart(&id, &query.days)
        .await
        .map_err(|e| -> (StatusCode, Json<serde_json::Value>) {
            MarketError::upstream("Failed to fetch market chart", format!("{:#}", e)).into()
        })?;

    Ok(Json(chart))
}

/// OHLC 프록시
/// Proxy for OHLC data
#[utoipa::path(
    get,
    path = "/api/market/ohlc/{id}",
    params(
        ("id" = String, Path, description = "CoinGecko coin id, e.g. bitcoin"),
        ChartQuery
    ),
    responses(
        (status = 200, description = "Upstream OHLC payload"),
        (status = 502, description = "Failed to fetch OHLC")
    ),
    tag = "Market"
)]
pub async fn get_ohlc(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let ohlc = app_state
        .market_state
        .client
        .ohlc(&id, &query.days)
        .await
        .map_err(|e| -> (StatusCode, Json<serde_json::Value>) {
            MarketError::upstream("Failed to fetch OHLC", format!("{:#}", e)).into()
        })?;

    Ok(Json(ohlc))
}

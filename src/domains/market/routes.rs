use axum::{routing::get, Router};
use crate::shared::services::AppState;

use super::handlers;

/// 시세 라우터 생성
/// Create market router
///
/// # Routes
/// - `GET /api/market/markets` - 상위 시세 목록
/// - `GET /api/market/price/:symbol` - 심볼 현재가
/// - `GET /api/market/market_chart/:id?days=1` - 가격 이력 프록시
/// - `GET /api/market/ohlc/:id?days=1` - OHLC 프록시
pub fn create_market_router() -> Router<AppState> {
    Router::new()
        .route("/markets", get(handlers::get_markets))
        .route("/price/:symbol", get(handlers::get_price))
        .route("/market_chart/:id", get(handlers::get_market_chart))
        .route("/ohlc/:id", get(handlers::get_ohlc))
}

/// 시세 WebSocket 라우터
/// - `GET /ws/market` - market:update 스트림
pub fn create_market_ws_router() -> Router<AppState> {
    Router::new().route("/market", get(handlers::market_stream))
}

use axum::{
    routing::{get, post},
    Router,
};
use crate::shared::services::AppState;

use super::handlers;

/// 거래 라우터 생성
/// Create trade router
///
/// # Routes
/// - `POST /api/trades` - 거래 정산 (매수/매도)
/// - `GET  /api/trades/my` - 내 거래 내역
pub fn create_trade_router() -> Router<AppState> {
    Router::new()
        // 거래 정산
        .route("/", post(handlers::place_trade))
        // 내 거래 내역
        .route("/my", get(handlers::get_my_trades))
}

/// 계정 라우터 생성
/// - `GET /api/account` - 내 잔고
pub fn create_account_router() -> Router<AppState> {
    Router::new().route("/", get(handlers::get_account))
}

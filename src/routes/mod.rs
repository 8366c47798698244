// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use axum::Router;
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::auth::routes::create_auth_router;
use crate::domains::trade::routes::{create_account_router, create_trade_router};
use crate::domains::market::routes::{create_market_router, create_market_ws_router};

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", create_auth_router())
        .nest("/api/trades", create_trade_router())
        .nest("/api/account", create_account_router())
        .nest("/api/market", create_market_router())
        .nest("/ws", create_market_ws_router())
}

use crate::domains::trade::models::{MyTradesQuery, PlaceTradeRequest, PlaceTradeResponse, TradesResponse};
use crate::domains::trade::services::SettlementRequest;
use crate::shared::errors::{SettlementError, StoreError};
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use tracing::{error, warn};

// =====================================================
// Trade Handler
// =====================================================
// 역할: 거래 정산 / 거래 내역 HTTP API 엔드포인트
//
// 특징:
// - 계정 ID 는 항상 인증된 사용자에서 가져옴
// - 요청 본문의 accountId 는 확인용 (다르면 403)
// =====================================================

/// 거래 요청 (매수/매도 정산)
/// Place trade handler
///
/// # Request Body
/// - accountId: 선택 (인증된 계정과 같아야 함)
/// - symbol: 자산 심볼 (예: "btc")
/// - side: "buy" | "sell"
/// - amount, priceAtTrade: 0 보다 큰 값
///
/// # Response
/// - 201: 정산 성공
/// - 400: 잘못된 요청 / 잔고 부족
/// - 403: 다른 계정으로 거래 시도
/// - 404: 계정 없음
/// - 409: 동시 수정 충돌 (재시도 가능)
/// - 500: 서버 오류
#[utoipa::path(
    post,
    path = "/api/trades",
    request_body = PlaceTradeRequest,
    responses(
        (status = 201, description = "Trade successful", body = PlaceTradeResponse),
        (status = 400, description = "Invalid argument or insufficient balance"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "accountId does not match the authenticated account"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Concurrent modification, safe to retry"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Trades"
)]
pub async fn place_trade(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<PlaceTradeRequest>,
) -> Result<(StatusCode, Json<PlaceTradeResponse>), (StatusCode, Json<serde_json::Value>)> {
    let account_id = authenticated_user.user_id;

    // 1. 다른 계정으로의 거래 차단
    if let Some(requested) = request.account_id {
        if requested != account_id {
            warn!(account_id, requested, "trade rejected: account mismatch");
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Cannot trade on behalf of another account" })),
            ));
        }
    }

    // 2. 요청 파싱 (side 는 buy / sell 만 허용)
    let settlement_request = SettlementRequest::parse(
        account_id,
        &request.symbol,
        &request.side,
        request.amount,
        request.price_at_trade,
    )
    .map_err(|e: SettlementError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    // 3. 정산
    let trade = app_state
        .trade_state
        .settlement_service
        .settle(settlement_request)
        .await
        .map_err(|e: SettlementError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceTradeResponse {
            message: "Trade successful".to_string(),
            trade,
        }),
    ))
}

/// 내 거래 내역 조회 핸들러
/// Get my trades handler
///
/// # Query Parameters
/// - symbol: 자산 심볼 (optional)
/// - limit: 최대 조회 개수 (optional, 기본: 100, 최대: 1000)
/// - offset: 페이지네이션 오프셋 (optional, 기본: 0)
#[utoipa::path(
    get,
    path = "/api/trades/my",
    params(
        MyTradesQuery
    ),
    responses(
        (status = 200, description = "Trades retrieved successfully", body = TradesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Trades"
)]
pub async fn get_my_trades(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Query(query): Query<MyTradesQuery>,
) -> Result<Json<TradesResponse>, (StatusCode, Json<serde_json::Value>)> {
    let trades = app_state
        .trade_state
        .trade_service
        .get_my_trades(authenticated_user.user_id, query.symbol, query.limit, query.offset)
        .await
        .map_err(|e: StoreError| -> (StatusCode, Json<serde_json::Value>) {
            error!(account_id = authenticated_user.user_id, error = %e, "failed to fetch trades");
            e.into()
        })?;

    Ok(Json(TradesResponse { trades }))
}

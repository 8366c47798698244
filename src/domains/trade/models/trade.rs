use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use crate::shared::errors::SettlementError;

// =====================================================
// Trade 모델
// =====================================================
// 역할: 정산이 끝난 거래 한 건 (append-only)
// 설명: 정산(Settlement) 성공 시에만 생성되며, 이후 수정/삭제되지 않음
//
// 정산 과정:
// 1. 계정 잠금 (트랜잭션 범위 시작)
// 2. 수수료/총액 계산
// 3. 잔고 검증 및 변경
// 4. Trade 레코드 생성
// 5. 커밋 (잔고 변경 + Trade 생성이 함께 반영)
// =====================================================

/// 거래 방향
/// Trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "buy" / "sell" 만 허용 (대소문자 구분)
impl FromStr for TradeSide {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            other => Err(SettlementError::InvalidArgument(format!(
                "side must be 'buy' or 'sell', got '{}'",
                other
            ))),
        }
    }
}

/// 체결된 거래 정보 (저장소에서 조회한 거래)
/// Persisted trade record
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[schema(as = Trade)]
pub struct Trade {
    /// Trade ID (generated by the store)
    /// 거래 ID (저장소에서 자동 생성)
    pub id: u64,

    /// Owning account ID
    /// 거래 계정 ID
    pub account_id: u64,

    /// Asset symbol (e.g., 'btc', 'eth')
    /// 자산 심볼
    #[schema(example = "btc")]
    pub symbol: String,

    /// 거래 방향
    pub side: TradeSide,

    /// Amount in asset units
    /// 거래 수량 (자산 단위)
    #[schema(value_type = String, example = "2")]
    pub amount: Decimal,

    /// Quote price per unit at trade time (USD)
    /// 거래 시점 단가 (USD)
    #[schema(value_type = String, example = "100")]
    pub price_at_trade: Decimal,

    /// Fee charged in quote currency
    /// 수수료 (USD)
    #[schema(value_type = String, example = "0.2")]
    pub fee: Decimal,

    /// Server-assigned creation time
    /// 거래 생성 시간 (서버에서 설정)
    pub timestamp: DateTime<Utc>,
}

// =====================================================
// 거래 생성용 (LedgerScope에서 사용)
// =====================================================
/// 거래 생성 시 사용하는 내부 모델 (저장용)
/// Internal model for inserting trades; id and timestamp come from the store
#[derive(Debug, Clone)]
pub struct TradeCreate {
    pub account_id: u64,
    pub symbol: String,
    pub side: TradeSide,
    pub amount: Decimal,
    pub price_at_trade: Decimal,
    pub fee: Decimal,
}

/// 거래 목록 조회 조건
/// Filter for listing an account's trades
#[derive(Debug, Clone)]
pub struct TradeQuery {
    pub account_id: u64,
    pub symbol: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

// =====================================================
// 요청/응답 모델
// =====================================================

/// 거래 요청 모델
/// Trade placement request
///
/// 기존 클라이언트 호환을 위해 userId / cryptoSymbol / type 별칭도 허용
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = PlaceTradeRequest)]
pub struct PlaceTradeRequest {
    /// Optional; must match the authenticated account when present
    /// 선택 사항 (있으면 인증된 계정과 같아야 함)
    #[serde(default, alias = "userId")]
    pub account_id: Option<u64>,

    #[serde(alias = "cryptoSymbol")]
    #[schema(example = "btc")]
    pub symbol: String,

    /// "buy" | "sell"
    #[serde(alias = "type")]
    #[schema(example = "buy")]
    pub side: String,

    #[schema(value_type = String, example = "2")]
    pub amount: Decimal,

    #[schema(value_type = String, example = "100")]
    pub price_at_trade: Decimal,
}

/// 거래 성공 응답
/// Trade placement response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = PlaceTradeResponse)]
pub struct PlaceTradeResponse {
    #[schema(example = "Trade successful")]
    pub message: String,
    pub trade: Trade,
}

/// 내 거래 내역 쿼리 파라미터
/// Query parameters for my trades
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct MyTradesQuery {
    /// 자산 심볼 필터 (선택)
    #[serde(default)]
    pub symbol: Option<String>,

    /// 최대 조회 개수 (기본: 100, 최대: 1000)
    #[serde(default)]
    pub limit: Option<i64>,

    /// 페이지네이션 오프셋 (기본: 0)
    #[serde(default)]
    pub offset: Option<i64>,
}

/// 거래 목록 응답 모델
/// Response model for list of trades
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = TradesResponse)]
pub struct TradesResponse {
    pub trades: Vec<Trade>,
}

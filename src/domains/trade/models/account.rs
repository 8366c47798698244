use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use rust_decimal::Decimal;

// =====================================================
// Account 모델
// =====================================================
// 역할: 정산 관점의 사용자 계정 (잔고만 다룸)
// 설명: users 테이블의 id / balance 컬럼에 대응
//
// 불변 조건:
// - balance >= 0 (다른 요청에 음수/중간 상태가 보이지 않음)
// - 정산(Settlement)만 balance 를 변경함
// =====================================================

/// 계정 잔고 정보
/// Ledger account
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[schema(as = Account)]
pub struct Account {
    /// Account ID (same as user ID)
    /// 계정 ID (사용자 ID와 동일)
    pub id: u64,

    /// Spendable balance in USD
    /// 사용 가능 잔고 (USD)
    #[schema(value_type = String, example = "10000")]
    pub balance: Decimal,
}

/// 계정 조회 응답
/// Account response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = AccountResponse)]
pub struct AccountResponse {
    pub account: Account,
}

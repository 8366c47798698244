use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;
use super::StoreError;

/// 거래 정산 에러
/// Settlement errors
///
/// 호출자는 "없음", "잔고 부족", "내부 오류"를 구분할 수 있어야 합니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// 계정을 찾을 수 없음 (변경 없음, 재시도 안 함)
    /// Referenced account does not exist
    #[error("User not found")]
    AccountNotFound { account_id: u64 },

    /// 잘못된 요청값 (side/amount/price/symbol)
    /// Malformed side, amount, price or symbol
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 매수 잔고 부족
    /// Buy exceeds available balance
    #[error("Insufficient balance")]
    InsufficientBalance,

    /// 동시 수정 충돌 (재시도 횟수 소진)
    /// Concurrent modification, retries exhausted
    #[error("Concurrent modification, please retry")]
    Conflict,

    /// 저장소 오류 / 예기치 못한 오류
    /// Store unavailable or unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SettlementError {
    /// 에러 종류 (응답 본문의 "kind")
    pub fn kind(&self) -> &'static str {
        match self {
            SettlementError::AccountNotFound { .. } => "account_not_found",
            SettlementError::InvalidArgument(_) => "invalid_argument",
            SettlementError::InsufficientBalance => "insufficient_balance",
            SettlementError::Conflict => "conflict",
            SettlementError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SettlementError::AccountNotFound { .. } => StatusCode::NOT_FOUND,
            SettlementError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            SettlementError::InsufficientBalance => StatusCode::BAD_REQUEST,
            SettlementError::Conflict => StatusCode::CONFLICT,
            SettlementError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for SettlementError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => SettlementError::Conflict,
            other => SettlementError::Internal(other.to_string()),
        }
    }
}

/// SettlementError를 HTTP 응답으로 변환
impl From<SettlementError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: SettlementError) -> Self {
        let status = err.status_code();
        let message = match &err {
            SettlementError::Internal(_) => "Internal Server Error".to_string(),
            _ => err.to_string(),
        };

        (status, Json(json!({ "error": message, "kind": err.kind() })))
    }
}

use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 원장 저장소 에러
/// Ledger store errors
///
/// 저장소 구현(PostgreSQL, 메모리)이 공통으로 반환하는 에러.
/// SettlementService 에서 SettlementError 로 변환됩니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 동시 수정으로 커밋할 수 없음 (재시도 가능)
    /// Concurrent modification, safe to retry from scratch
    #[error("concurrent modification detected")]
    Conflict,

    /// 제약 조건 위반 (예: balance >= 0)
    /// Constraint violation
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// 저장소 사용 불가 / 타임아웃 / 기타 오류
    /// Store unavailable, timed out, or failed unexpectedly
    #[error("store failure: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.code().as_deref() {
                // serialization_failure, deadlock_detected
                Some("40001") | Some("40P01") => return StoreError::Conflict,
                // check_violation
                Some("23514") => return StoreError::Constraint(db_err.message().to_string()),
                _ => {}
            }
        }
        StoreError::Unavailable(err.to_string())
    }
}

/// StoreError를 HTTP 응답으로 변환 (조회 API)
///
/// 저장소 세부 내용은 응답에 포함하지 않음 (호출 측에서 로그)
impl From<StoreError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Concurrent modification, please retry" })),
            ),
            StoreError::Constraint(_) | StoreError::Unavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_details_are_not_exposed() {
        let (status, Json(body)) = <(StatusCode, Json<serde_json::Value>)>::from(
            StoreError::Unavailable("connection to 10.0.0.5 refused".into()),
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal Server Error" }));
    }

    #[test]
    fn conflict_is_retryable_status() {
        let (status, _) = <(StatusCode, Json<serde_json::Value>)>::from(StoreError::Conflict);
        assert_eq!(status, StatusCode::CONFLICT);
    }
}

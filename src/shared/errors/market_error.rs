use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 시세 조회 에러
/// Market data errors
#[derive(Error, Debug)]
pub enum MarketError {
    /// 외부 시세 API 호출 실패
    /// Upstream market-data API failed
    #[error("{context}: {message}")]
    Upstream { context: String, message: String },

    /// 해당 심볼의 시세 없음
    /// No price known for the symbol
    #[error("No market data for symbol: {symbol}")]
    SymbolNotFound { symbol: String },
}

impl MarketError {
    pub fn upstream(context: &str, err: impl std::fmt::Display) -> Self {
        MarketError::Upstream {
            context: context.to_string(),
            message: err.to_string(),
        }
    }
}

/// MarketError를 HTTP 응답으로 변환
impl From<MarketError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: MarketError) -> Self {
        match &err {
            MarketError::Upstream { context, message } => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": context, "message": message })),
            ),
            MarketError::SymbolNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": err.to_string() })),
            ),
        }
    }
}

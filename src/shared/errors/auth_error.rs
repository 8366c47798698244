use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::json;

/// 입력값 검증 실패 항목
/// A single field that failed request validation
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// 인증 관련 에러
/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// 이메일이 이미 존재함
    /// Email already exists
    #[error("Email already registered")]
    EmailAlreadyExists { email: String },

    /// 사용자명이 이미 존재함
    /// Username already taken
    #[error("Username already taken")]
    UsernameAlreadyExists { username: String },

    /// 요청 형식 오류 (이메일 형식, 비밀번호 길이 등)
    /// Request validation failed
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// 잘못된 이메일 또는 비밀번호
    /// Invalid email or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 사용자를 찾을 수 없음
    /// User not found
    #[error("User not found")]
    UserNotFound { id: u64 },

    /// 비밀번호 해싱 실패
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    PasswordHashingFailed(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),

    /// 잘못된 또는 만료된 토큰
    /// Invalid or expired token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// 토큰이 제공되지 않음
    /// Token not provided
    #[error("Token not provided")]
    MissingToken,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailAlreadyExists { .. } | AuthError::UsernameAlreadyExists { .. } => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            AuthError::InvalidToken | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::PasswordHashingFailed(_)
            | AuthError::DatabaseError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// AuthError를 HTTP 응답으로 변환
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        let status = err.status_code();

        // 내부 오류 메시지는 로그에만 남김
        let body = match &err {
            AuthError::Validation(errors) => json!({ "error": err.to_string(), "errors": errors }),
            AuthError::PasswordHashingFailed(_)
            | AuthError::DatabaseError(_)
            | AuthError::Internal(_) => {
                tracing::error!(error = %err, "auth request failed");
                json!({ "error": "Internal Server Error" })
            }
            _ => json!({ "error": err.to_string() }),
        };

        (status, Json(body))
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserResponse;

// 회원가입 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RegisterRequest)]
pub struct RegisterRequest {
    /// Username (stored lower-cased)
    /// 사용자명 (소문자로 저장)
    #[schema(example = "johndoe")]
    pub username: String,

    /// Email address (stored lower-cased)
    /// 이메일 주소
    #[schema(example = "user@example.com")]
    pub email: String,

    /// Password, at least 8 characters (will be hashed)
    /// 비밀번호 (8자 이상, 해싱됨)
    #[schema(example = "password123")]
    pub password: String,

    /// Display name
    /// 표시 이름 (없으면 사용자명)
    #[serde(default)]
    #[schema(example = "John Doe")]
    pub name: Option<String>,

    /// "admin" | "user" (기본: user)
    #[serde(default)]
    #[schema(example = "user")]
    pub role: Option<String>,
}

// 회원가입 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RegisterResponse)]
pub struct RegisterResponse {
    /// Success message
    /// 성공 메시지
    #[schema(example = "User created successfully")]
    pub message: String,

    /// User information (without password)
    /// 사용자 정보 (비밀번호 제외)
    pub user: UserResponse,
}

// 로그인 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LoginRequest)]
pub struct LoginRequest {
    #[schema(example = "user@example.com")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,
}

// 로그인 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LoginResponse)]
pub struct LoginResponse {
    /// JWT Access Token (24시간)
    /// JWT access token (24h lifetime)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,

    pub user: UserResponse,
}

// 토큰 검증 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = VerifyResponse)]
pub struct VerifyResponse {
    pub user: UserResponse,
}

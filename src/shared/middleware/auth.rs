use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use crate::domains::auth::models::UserRole;
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;
use serde_json::json;

/// 인증된 사용자 정보 (JWT 토큰에서 추출)
/// Authenticated user information (extracted from JWT token)
///
/// user_id 는 정산에서 신뢰된 계정 ID 로 사용됩니다.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: u64,
    pub email: String,
    pub role: UserRole,
}

/// AuthenticatedUser를 Axum Extractor로 구현
///
/// 사용법:
/// ```rust,ignore
/// pub async fn place_trade(
///     State(app_state): State<AppState>,
///     authenticated_user: AuthenticatedUser,  // <- 이렇게 사용!
/// ) -> Result<...> {
///     let account_id = authenticated_user.user_id;
///     // ...
/// }
/// ```
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = (StatusCode, axum::Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 1. Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| -> Self::Rejection { AuthError::MissingToken.into() })?
            .to_str()
            .map_err(|_| {
                (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(json!({ "error": "Invalid authorization header" })),
                )
            })?;

        // 2. "Bearer <token>" 형식 파싱
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({
                    "error": "Invalid authorization format. Expected: 'Bearer <token>'"
                })),
            )
        })?;

        // 3. 신원 제공자로 토큰 검증
        let identity = state
            .auth_state
            .identity
            .verify(token)
            .await
            .map_err(|e: AuthError| -> Self::Rejection { e.into() })?;

        Ok(AuthenticatedUser {
            user_id: identity.user_id,
            email: identity.email,
            role: identity.role,
        })
    }
}

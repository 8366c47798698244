use async_trait::async_trait;
use crate::domains::auth::models::user::UserRole;
use crate::shared::errors::AuthError;

/// 인증된 신원 (토큰에서 추출)
/// Identity carried by a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// 계정 ID (= 사용자 ID)
    pub user_id: u64,
    pub email: String,
    pub role: UserRole,
}

/// 신원 제공자
/// Identity provider
///
/// 정산은 여기서 나온 user_id 만 신뢰된 계정 ID 로 사용합니다.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 이메일/비밀번호 확인 후 토큰 발급
    /// Check credentials and issue a session token
    async fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// 토큰 검증
    /// Verify a session token
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

// Auth domain state
// 인증 도메인 상태
use std::sync::Arc;
use crate::config::AppConfig;
use crate::shared::database::Database;
use crate::domains::auth::services::{AuthService, IdentityProvider, JwtService};

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
    /// 요청 인증에 사용하는 신원 제공자
    pub identity: Arc<dyn IdentityProvider>,
}

impl AuthState {
    /// AuthState 생성 (데이터베이스와 설정 필요)
    pub fn new(db: Database, config: &AppConfig) -> Self {
        let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.expiration_hours);
        let auth_service = AuthService::new(db, jwt_service.clone(), config.account.initial_balance);

        Self {
            identity: Arc::new(auth_service.clone()),
            auth_service,
            jwt_service,
        }
    }
}

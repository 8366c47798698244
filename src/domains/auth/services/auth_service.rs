use crate::shared::database::{Database, UserRepository};
use crate::domains::auth::models::{LoginRequest, RegisterRequest, User, UserCreate, UserRole};
use crate::domains::auth::services::{Identity, IdentityProvider, JwtService};
use crate::shared::errors::{AuthError, FieldError};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{info, warn};

/// 비밀번호 최소 길이
pub const MIN_PASSWORD_LEN: usize = 8;

/// 개발 환경 기본 사용자 (username, email, password, name, role)
const DEFAULT_USERS: [(&str, &str, &str, &str, UserRole); 2] = [
    ("admin", "admin@cryptozen.com", "Admin@123", "Admin User", UserRole::Admin),
    ("guest", "guest@cryptozen.com", "Guest@123", "Guest User", UserRole::User),
];

// 인증 서비스
// AuthService: handles registration, login and token verification
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt_service: JwtService,
    /// 신규 계정 초기 잔고
    initial_balance: Decimal,
}

impl AuthService {
    pub fn new(db: Database, jwt_service: JwtService, initial_balance: Decimal) -> Self {
        Self {
            db,
            jwt_service,
            initial_balance,
        }
    }

    // 회원가입 (비즈니스 로직)
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        validate_register(&request)?;

        let username = request.username.trim().to_lowercase();
        let email = request.email.trim().to_lowercase();
        let user_repo = UserRepository::new(self.db.pool().clone());

        // 1. 이메일 중복 확인
        let existing = user_repo
            .get_user_by_email(&email)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to check email existence: {}", e)))?;
        if existing.is_some() {
            return Err(AuthError::EmailAlreadyExists { email });
        }

        // 2. 사용자명 중복 확인
        let existing = user_repo
            .get_user_by_username(&username)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to check username existence: {}", e)))?;
        if existing.is_some() {
            return Err(AuthError::UsernameAlreadyExists { username });
        }

        // 3. 비밀번호 해싱
        let password_hash = hash_password(&request.password)?;

        // 4. 사용자 + 계정 생성
        let name = request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| username.clone());

        let user = user_repo
            .create_user(&UserCreate {
                username,
                email: email.clone(),
                password_hash,
                name,
                role: UserRole::from_requested(request.role.as_deref()),
                balance: self.initial_balance,
            })
            .await
            .map_err(|e| {
                // 동시 가입으로 중복 확인을 통과한 경우 UNIQUE 제약에서 걸림
                if is_unique_violation(&e) {
                    AuthError::EmailAlreadyExists { email }
                } else {
                    AuthError::DatabaseError(format!("Failed to create user: {}", e))
                }
            })?;

        info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    // 로그인 (비즈니스 로직)
    // Returns: (User, access_token)
    pub async fn login(&self, request: LoginRequest) -> Result<(User, String), AuthError> {
        validate_credentials(&request.email, &request.password)?;

        let user_repo = UserRepository::new(self.db.pool().clone());

        // 1. 이메일로 사용자 조회
        let user = user_repo
            .get_user_by_email(&request.email.trim().to_lowercase())
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or(AuthError::InvalidCredentials)?;

        // 2. 비밀번호 검증
        verify_password(&request.password, &user.password_hash)?;

        // 3. Access Token 발급
        let token = self
            .jwt_service
            .generate_access_token(user.id, user.email.clone(), user.role)?;

        info!(user_id = user.id, username = %user.username, "user logged in");
        Ok((user, token))
    }

    /// 사용자 조회 (토큰 검증 후 사용)
    /// Get user info
    pub async fn get_user_info(&self, user_id: u64) -> Result<User, AuthError> {
        let user_repo = UserRepository::new(self.db.pool().clone());

        user_repo
            .get_user_by_id(user_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or(AuthError::UserNotFound { id: user_id })
    }

    /// 기본 사용자 생성 (없을 때만)
    /// Seed the default admin and guest users if missing
    pub async fn seed_default_users(&self) -> Result<(), AuthError> {
        let user_repo = UserRepository::new(self.db.pool().clone());

        for (username, email, password, name, role) in DEFAULT_USERS {
            let existing = user_repo
                .get_user_by_email(email)
                .await
                .map_err(|e| AuthError::DatabaseError(format!("Failed to check default user: {}", e)))?;
            if existing.is_some() {
                continue;
            }

            user_repo
                .create_user(&UserCreate {
                    username: username.to_string(),
                    email: email.to_string(),
                    password_hash: hash_password(password)?,
                    name: name.to_string(),
                    role,
                    balance: self.initial_balance,
                })
                .await
                .map_err(|e| AuthError::DatabaseError(format!("Failed to create default user: {}", e)))?;

            info!(username, "created default user");
        }

        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for AuthService {
    async fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let (_, token) = self
            .login(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(token)
    }

    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.jwt_service.verify_access_token(token).inspect_err(|_| {
            warn!("rejected invalid or expired token");
        })?;

        Ok(Identity {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

// ===== 입력 검증 =====

/// 회원가입 요청 검증 (필드별 에러 수집)
pub fn validate_register(request: &RegisterRequest) -> Result<(), AuthError> {
    let mut errors = credential_errors(&request.email, &request.password);
    if request.username.trim().is_empty() {
        errors.push(FieldError::new("username", "Username is required"));
    }

    if errors.is_empty() { Ok(()) } else { Err(AuthError::Validation(errors)) }
}

/// 로그인 요청 검증
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    let errors = credential_errors(email, password);
    if errors.is_empty() { Ok(()) } else { Err(AuthError::Validation(errors)) }
}

fn credential_errors(email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !is_valid_email(email.trim()) {
        errors.push(FieldError::new("email", "Please provide a valid email"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters long",
        ));
    }
    errors
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

// ===== 비밀번호 =====

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|e| e.code())
        .is_some_and(|code| code == "23505")
}

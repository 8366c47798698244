use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// 사용자 역할
/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    /// 요청된 역할 해석: 정확히 "admin" 일 때만 Admin, 나머지는 User
    /// Resolve a requested role; anything other than exactly "admin" is a plain user
    pub fn from_requested(requested: Option<&str>) -> Self {
        match requested {
            Some("admin") => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            other => Err(anyhow::anyhow!("unknown user role: {}", other)),
        }
    }
}

/// 사용자 (users 테이블)
/// User row; `id` doubles as the ledger account id
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 사용자 생성용 (저장용)
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub balance: Decimal,
}

/// 사용자 응답 모델 (비밀번호 제외)
/// User information without the password hash
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = UserResponse)]
pub struct UserResponse {
    pub id: u64,
    #[schema(example = "johndoe")]
    pub username: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "John Doe")]
    pub name: String,
    pub role: UserRole,
    /// 사용 가능 잔고 (USD)
    #[schema(value_type = String, example = "10000")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            role: user.role,
            balance: user.balance,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_admin_is_admin() {
        assert_eq!(UserRole::from_requested(Some("admin")), UserRole::Admin);
        assert_eq!(UserRole::from_requested(Some("Admin")), UserRole::User);
        assert_eq!(UserRole::from_requested(Some("root")), UserRole::User);
        assert_eq!(UserRole::from_requested(None), UserRole::User);
    }
}

use sqlx::{PgPool, Row};
use anyhow::{Context, Result};
use chrono::Utc;
use crate::domains::auth::models::user::{User, UserCreate};


pub struct UserRepository {
    pool: PgPool
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 사용자 생성 (초기 잔고 포함)
    /// Create user together with the account's opening balance
    pub async fn create_user(&self, user_create: &UserCreate) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, name, role, balance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, username, email, password_hash, name, role, balance, created_at, updated_at
            "#,
        )
        .bind(&user_create.username)
        .bind(&user_create.email)
        .bind(&user_create.password_hash)
        .bind(&user_create.name)
        .bind(user_create.role.as_str())
        .bind(user_create.balance)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create user")?;

        Self::row_to_user(&row)
    }

    // 이메일로 사용자 조회 (로그인용)
    // Get user by email (for login)
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, name, role, balance, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    // 사용자명으로 사용자 조회 (중복 확인용)
    // Get user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, name, role, balance, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by username")?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    // ID로 사용자 조회
    // Get user by ID
    pub async fn get_user_by_id(&self, id: u64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, name, role, balance, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by id")?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User> {
        let role: String = row.get("role");

        Ok(User {
            id: row.get::<i64, _>("id") as u64,
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            name: row.get("name"),
            role: role.parse()?,
            balance: row.get("balance"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

use sqlx::{PgConnection, PgPool, Row};
use chrono::Utc;
use rust_decimal::Decimal;
use crate::domains::trade::models::Account;
use crate::shared::errors::StoreError;

/// 계정 잔고 저장소 (users 테이블의 id / balance)
/// Account balance repository backed by the users table
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 계정 조회 (커밋된 잔고)
    /// Get account by ID
    pub async fn get_by_id(&self, account_id: u64) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, balance
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(account_id as i64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Self::row_to_account(&r)))
    }

    /// 계정 행 잠금 후 조회 (트랜잭션 안에서만 사용)
    /// Lock the account row for the rest of the transaction
    ///
    /// 같은 계정을 잠그려는 다른 트랜잭션은 커밋/롤백까지 대기합니다.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        account_id: u64,
    ) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, balance
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(account_id as i64)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|r| Self::row_to_account(&r)))
    }

    /// 잔고 설정 (트랜잭션 안에서만 사용)
    /// Set the account balance inside the caller's transaction
    pub async fn set_balance(
        conn: &mut PgConnection,
        account_id: u64,
        balance: Decimal,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET balance = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(balance)
        .bind(Utc::now())
        .bind(account_id as i64)
        .execute(conn)
        .await?;

        if result.rows_affected() != 1 {
            return Err(StoreError::Unavailable(format!(
                "balance update touched {} rows for account {}",
                result.rows_affected(),
                account_id
            )));
        }

        Ok(())
    }

    fn row_to_account(row: &sqlx::postgres::PgRow) -> Account {
        Account {
            id: row.get::<i64, _>("id") as u64,
            balance: row.get("balance"),
        }
    }
}

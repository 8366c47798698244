use sqlx::{PgConnection, PgPool, Row};
use chrono::Utc;
use crate::domains::trade::models::{Trade, TradeCreate, TradeQuery, TradeSide};
use crate::shared::errors::StoreError;

/// 거래 기록 저장소 (append-only)
/// Trade record repository
pub struct TradeRepository {
    pool: PgPool,
}

impl TradeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 거래 기록 생성 (트랜잭션 안에서만 사용)
    /// Insert a trade inside the caller's transaction
    pub async fn insert(conn: &mut PgConnection, trade_create: &TradeCreate) -> Result<Trade, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO trades (
                account_id, symbol, side, amount, price_at_trade, fee, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, account_id, symbol, side, amount, price_at_trade, fee, created_at
            "#,
        )
        .bind(trade_create.account_id as i64)
        .bind(&trade_create.symbol)
        .bind(trade_create.side.as_str())
        .bind(trade_create.amount)
        .bind(trade_create.price_at_trade)
        .bind(trade_create.fee)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Self::row_to_trade(&row)
    }

    /// 계정별 거래 조회 (최신순, 심볼 필터 선택)
    /// Get trades by account, optionally filtered by symbol (newest first)
    ///
    /// (account_id, symbol) 인덱스 사용
    pub async fn get_by_account(&self, query: &TradeQuery) -> Result<Vec<Trade>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, symbol, side, amount, price_at_trade, fee, created_at
            FROM trades
            WHERE account_id = $1
              AND ($2::TEXT IS NULL OR symbol = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.account_id as i64)
        .bind(query.symbol.as_deref())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_trade).collect()
    }

    /// Row를 Trade로 변환하는 헬퍼 메서드
    /// Helper method to convert Row to Trade
    fn row_to_trade(row: &sqlx::postgres::PgRow) -> Result<Trade, StoreError> {
        let side: String = row.get("side");
        let side = side
            .parse::<TradeSide>()
            .map_err(|e| StoreError::Unavailable(format!("corrupt trade row: {}", e)))?;

        Ok(Trade {
            id: row.get::<i64, _>("id") as u64,
            account_id: row.get::<i64, _>("account_id") as u64,
            symbol: row.get("symbol"),
            side,
            amount: row.get("amount"),
            price_at_trade: row.get("price_at_trade"),
            fee: row.get("fee"),
            timestamp: row.get("created_at"),
        })
    }
}

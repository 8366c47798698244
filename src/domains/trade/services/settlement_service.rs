use std::sync::Arc;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};
use crate::domains::trade::ledger::{LedgerScope, LedgerStore};
use crate::domains::trade::models::{Trade, TradeCreate, TradeSide};
use crate::shared::errors::SettlementError;

/// 수수료율 (퍼센트 단위: 0.1 = 0.1%)
/// Fee percentage; applied as `notional * FEE_PERCENTAGE / 100`
pub const FEE_PERCENTAGE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// 심볼 최대 길이
pub const MAX_SYMBOL_LEN: usize = 32;

/// 거래 금액 계산 결과
/// Amounts derived from a trade's size and price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeCharges {
    /// amount * price
    pub notional: Decimal,
    /// notional * 0.1 / 100
    pub fee: Decimal,
    /// notional + fee
    pub total_cost: Decimal,
}

impl TradeCharges {
    /// 수수료 / 총액 계산 (오버플로 시 InvalidArgument)
    /// Compute fee and total cost
    pub fn compute(amount: Decimal, price_at_trade: Decimal) -> Result<Self, SettlementError> {
        let overflow = || SettlementError::InvalidArgument("amount * priceAtTrade is too large".to_string());

        let notional = amount.checked_mul(price_at_trade).ok_or_else(overflow)?;
        let fee = notional
            .checked_mul(FEE_PERCENTAGE)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(overflow)?;
        let total_cost = notional.checked_add(fee).ok_or_else(overflow)?;

        Ok(Self {
            notional,
            fee,
            total_cost,
        })
    }

    /// 매도 시 입금액 = total_cost - fee
    ///
    /// 결과적으로 notional 과 같아서 매도에는 수수료가 반영되지 않음 (매수와 비대칭).
    /// 기존 동작 그대로 유지, 변경하려면 정책 결정 필요.
    pub fn sell_credit(&self) -> Decimal {
        self.total_cost - self.fee
    }
}

/// 정산 요청 (검증 전)
/// Settlement request as received from the caller
#[derive(Debug, Clone)]
pub struct SettlementRequest {
    pub account_id: u64,
    pub symbol: String,
    pub side: TradeSide,
    pub amount: Decimal,
    pub price_at_trade: Decimal,
}

impl SettlementRequest {
    /// 문자열 side 를 포함한 원시 입력으로부터 생성
    /// Build a request from raw input; `side` must be exactly "buy" or "sell"
    pub fn parse(
        account_id: u64,
        symbol: &str,
        side: &str,
        amount: Decimal,
        price_at_trade: Decimal,
    ) -> Result<Self, SettlementError> {
        Ok(Self {
            account_id,
            symbol: symbol.to_string(),
            side: side.parse()?,
            amount,
            price_at_trade,
        })
    }

    fn validate(self) -> Result<ValidatedSettlement, SettlementError> {
        if self.amount <= Decimal::ZERO {
            return Err(SettlementError::InvalidArgument("amount must be greater than 0".to_string()));
        }
        if self.price_at_trade <= Decimal::ZERO {
            return Err(SettlementError::InvalidArgument(
                "priceAtTrade must be greater than 0".to_string(),
            ));
        }

        let symbol = self.symbol.trim();
        if symbol.is_empty() {
            return Err(SettlementError::InvalidArgument("symbol is required".to_string()));
        }
        if symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(SettlementError::InvalidArgument(format!(
                "symbol must be at most {} characters",
                MAX_SYMBOL_LEN
            )));
        }

        let charges = TradeCharges::compute(self.amount, self.price_at_trade)?;

        Ok(ValidatedSettlement {
            account_id: self.account_id,
            symbol: symbol.to_string(),
            side: self.side,
            amount: self.amount,
            price_at_trade: self.price_at_trade,
            charges,
        })
    }
}

/// 검증 완료된 정산 요청
#[derive(Debug, Clone)]
struct ValidatedSettlement {
    account_id: u64,
    symbol: String,
    side: TradeSide,
    amount: Decimal,
    price_at_trade: Decimal,
    charges: TradeCharges,
}

/// 거래 정산 서비스
/// Settlement Service
///
/// 역할:
/// - 매수/매도 요청을 검증하고 계정 잔고에 원자적으로 반영
/// - 잔고 변경과 거래 기록은 하나의 LedgerScope 안에서 함께 커밋되거나 함께 폐기됨
///
/// 처리 흐름:
/// 1. 입력 검증 (저장소 접근 전)
/// 2. scope 시작 → 계정 잠금
/// 3. 매수: 잔고 >= 총액 확인 후 차감 / 매도: total_cost - fee 입금
/// 4. 잔고 기록 + 거래 기록
/// 5. 커밋 (실패 시 abort 후 에러 전파)
///
/// Conflict 는 처음부터 다시 시도 (잔고 재조회, 재계산), 최대 max_attempts 회.
#[derive(Clone)]
pub struct SettlementService {
    ledger: Arc<dyn LedgerStore>,
    max_attempts: u32,
}

impl SettlementService {
    pub fn new(ledger: Arc<dyn LedgerStore>, max_attempts: u32) -> Self {
        Self {
            ledger,
            max_attempts: max_attempts.max(1),
        }
    }

    /// 거래 정산
    /// Settle one buy/sell against an account
    ///
    /// # Returns
    /// * `Ok(Trade)` - 커밋된 거래 기록
    /// * `Err(AccountNotFound | InvalidArgument | InsufficientBalance)` - 변경 없음
    /// * `Err(Conflict)` - 재시도 횟수 소진
    /// * `Err(Internal)` - 저장소 오류
    pub async fn settle(&self, request: SettlementRequest) -> Result<Trade, SettlementError> {
        let order = request.validate().inspect_err(|e| {
            debug!(error = %e, "settlement rejected by validation");
        })?;

        let mut attempt = 1;
        loop {
            match self.settle_once(&order).await {
                Err(SettlementError::Conflict) if attempt < self.max_attempts => {
                    warn!(
                        account_id = order.account_id,
                        attempt,
                        max_attempts = self.max_attempts,
                        "settlement conflicted with a concurrent update, retrying"
                    );
                    attempt += 1;
                    tokio::task::yield_now().await;
                }
                result => return result,
            }
        }
    }

    async fn settle_once(&self, order: &ValidatedSettlement) -> Result<Trade, SettlementError> {
        let mut scope = self.ledger.begin().await?;

        match Self::apply(scope.as_mut(), order).await {
            Ok(trade) => {
                if let Err(commit_err) = scope.commit().await {
                    let err = SettlementError::from(commit_err);
                    if err != SettlementError::Conflict {
                        error!(
                            account_id = order.account_id,
                            error = %err,
                            "failed to commit settlement scope; outcome unknown, operator attention required"
                        );
                    }
                    return Err(err);
                }
                info!(
                    trade_id = trade.id,
                    account_id = trade.account_id,
                    symbol = %trade.symbol,
                    side = %trade.side,
                    amount = %trade.amount,
                    price_at_trade = %trade.price_at_trade,
                    fee = %trade.fee,
                    "trade settled"
                );
                Ok(trade)
            }
            Err(err) => {
                if let Err(abort_err) = scope.abort().await {
                    error!(
                        account_id = order.account_id,
                        cause = %err,
                        error = %abort_err,
                        "failed to abort settlement scope; potential inconsistency, operator attention required"
                    );
                }
                match &err {
                    SettlementError::InsufficientBalance | SettlementError::AccountNotFound { .. } => {
                        warn!(account_id = order.account_id, error = %err, "settlement rejected");
                    }
                    SettlementError::Conflict => {}
                    _ => error!(account_id = order.account_id, error = %err, "settlement failed"),
                }
                Err(err)
            }
        }
    }

    /// scope 안에서 잔고 변경 + 거래 기록
    async fn apply(scope: &mut dyn LedgerScope, order: &ValidatedSettlement) -> Result<Trade, SettlementError> {
        let account = scope
            .lock_account(order.account_id)
            .await?
            .ok_or(SettlementError::AccountNotFound {
                account_id: order.account_id,
            })?;

        let charges = &order.charges;
        let new_balance = match order.side {
            TradeSide::Buy => {
                if account.balance < charges.total_cost {
                    return Err(SettlementError::InsufficientBalance);
                }
                account.balance - charges.total_cost
            }
            TradeSide::Sell => account
                .balance
                .checked_add(charges.sell_credit())
                .ok_or_else(|| SettlementError::InvalidArgument("resulting balance is too large".to_string()))?,
        };

        scope.update_balance(account.id, new_balance).await?;

        let trade = scope
            .insert_trade(&TradeCreate {
                account_id: account.id,
                symbol: order.symbol.clone(),
                side: order.side,
                amount: order.amount,
                price_at_trade: order.price_at_trade,
                fee: charges.fee,
            })
            .await?;

        Ok(trade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_is_one_tenth_of_a_percent() {
        let charges = TradeCharges::compute(Decimal::new(2, 0), Decimal::new(100, 0)).unwrap();
        assert_eq!(charges.notional, Decimal::new(200, 0));
        assert_eq!(charges.fee, Decimal::new(2, 1));
        assert_eq!(charges.total_cost, Decimal::new(2002, 1));
    }

    #[test]
    fn sell_credit_equals_gross_notional() {
        let charges = TradeCharges::compute(Decimal::ONE, Decimal::new(50, 0)).unwrap();
        assert_eq!(charges.fee, Decimal::new(5, 2));
        assert_eq!(charges.total_cost, Decimal::new(5005, 2));
        assert_eq!(charges.sell_credit(), Decimal::new(50, 0));
    }

    #[test]
    fn overflow_is_invalid_argument() {
        let err = TradeCharges::compute(Decimal::MAX, Decimal::new(2, 0)).unwrap_err();
        assert!(matches!(err, SettlementError::InvalidArgument(_)));
    }

    #[test]
    fn validation_rejects_bad_inputs() {
        let request = |symbol: &str, amount: i64, price: i64| SettlementRequest {
            account_id: 1,
            symbol: symbol.to_string(),
            side: TradeSide::Buy,
            amount: Decimal::new(amount, 0),
            price_at_trade: Decimal::new(price, 0),
        };

        assert!(request("btc", 0, 1).validate().is_err());
        assert!(request("btc", -1, 1).validate().is_err());
        assert!(request("btc", 1, 0).validate().is_err());
        assert!(request("   ", 1, 1).validate().is_err());
        assert!(request(&"x".repeat(MAX_SYMBOL_LEN + 1), 1, 1).validate().is_err());

        let ok = request("  btc ", 1, 1).validate().unwrap();
        assert_eq!(ok.symbol, "btc");
    }

    #[test]
    fn parse_rejects_unknown_side() {
        let err = SettlementRequest::parse(1, "btc", "short", Decimal::ONE, Decimal::ONE).unwrap_err();
        assert!(matches!(err, SettlementError::InvalidArgument(_)));
    }
}

use rust_decimal::Decimal;

/// 현재가 조회
/// Read-only spot price lookup
///
/// 정산은 가격을 요청에서 받으므로 이 trait 을 사용하지 않습니다.
pub trait PriceFeed: Send + Sync {
    /// 심볼의 최신 가격 (대소문자 무시), 모르면 None
    fn spot_price(&self, symbol: &str) -> Option<Decimal>;
}

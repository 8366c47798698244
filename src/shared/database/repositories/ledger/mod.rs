// Ledger repositories (계정 잔고 / 거래 기록)
pub mod account_repository;
pub mod trade_repository;

pub use account_repository::*;
pub use trade_repository::*;

// Trade handlers module
// 거래 핸들러 모듈

pub mod account_handler;
pub mod trade_handler;

pub use account_handler::*;
pub use trade_handler::*;

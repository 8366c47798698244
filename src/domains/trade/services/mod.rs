// Trade services module
// 거래 서비스 모듈

pub mod settlement_service;
pub mod trade_service;
pub mod state;

pub use settlement_service::*;
pub use trade_service::*;
pub use state::*;

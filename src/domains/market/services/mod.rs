// Market services module
// 시세 서비스 모듈

pub mod market_feed;
pub mod market_poller;
pub mod price_feed;
pub mod state;

pub use market_feed::*;
pub use market_poller::*;
pub use price_feed::*;
pub use state::*;

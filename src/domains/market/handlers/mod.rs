// Market handlers
pub mod market_handler;
pub mod ws_handler;

pub use market_handler::*;
pub use ws_handler::*;

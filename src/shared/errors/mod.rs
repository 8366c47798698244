// Shared errors
pub mod auth_error;
pub mod market_error;
pub mod settlement_error;
pub mod store_error;

pub use auth_error::*;
pub use market_error::*;
pub use settlement_error::*;
pub use store_error::*;

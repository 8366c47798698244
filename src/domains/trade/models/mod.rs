// Trade domain models
pub mod account;
pub mod trade;

pub use account::*;
pub use trade::*;

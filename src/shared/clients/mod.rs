// External API clients
pub mod coingecko;

pub use coingecko::*;

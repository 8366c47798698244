// Middleware (extractors)
pub mod auth;

pub use auth::*;

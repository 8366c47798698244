// Trade domain module
pub mod models;
pub mod ledger;
pub mod services;
pub mod handlers;
pub mod routes;

pub use models::*;

// Domains module
pub mod auth;
pub mod market;
pub mod trade;

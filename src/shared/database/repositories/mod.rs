// All repositories module
pub mod auth;
pub mod ledger;

// Re-export all repositories for convenience
pub use auth::*;
pub use ledger::*;

// Request/Response models
pub mod balances;
pub mod cash;
pub mod common;
pub mod directory;
pub mod subscriptions;

// Service modules
pub mod balance_ledger;
pub mod cash_book_service;
pub mod directory_service;
pub mod ledger_coordinator;
pub mod subscription_store;

pub use cash_book_service::CashBookService;
pub use directory_service::DirectoryService;
pub use ledger_coordinator::LedgerCoordinator;

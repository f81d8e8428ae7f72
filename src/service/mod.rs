mod locks;
mod transaction_service;
mod validation;

pub use transaction_service::TransactionService;

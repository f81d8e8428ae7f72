mod transaction_storage;
#[cfg(test)]
mod tests;

use crate::models::Transaction;
use crate::types::{PageRequest, TransactionId};

pub use transaction_storage::TransactionStorage;

/// Keyed container for transaction records.
///
/// Implementations are pure storage: no validation, no identifier generation,
/// and absence is reported as `None` rather than as an error. Every method must
/// be atomic and safe to call from any number of threads at once.
pub trait Storage: Send + Sync + 'static {
    /// Inserts or fully replaces the record stored under `transaction.id`.
    fn save(&self, transaction: Transaction) -> Transaction;
    fn find_by_id(&self, transaction_id: TransactionId) -> Option<Transaction>;
    /// Returns one window of the records ordered by timestamp descending, then id ascending.
    fn find_all(&self, page: PageRequest) -> Vec<Transaction>;
    /// Removes the record if present. Deleting a missing id is a no-op.
    fn delete_by_id(&self, transaction_id: TransactionId);
    fn len(&self) -> usize;
}

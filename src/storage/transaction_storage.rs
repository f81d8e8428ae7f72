use std::cmp::Ordering;

use crate::models::Transaction;
use crate::storage::Storage;
use crate::types::{PageRequest, TransactionId};
use dashmap::DashMap;

pub struct TransactionStorage {
    records: DashMap<TransactionId, Transaction>
}

impl TransactionStorage {
    pub fn new() -> Self {
        Self {
            records: DashMap::new()
        }
    }

    /// Owned copies of every record, in listing order.
    ///
    /// Each shard is read under its own lock, so an entry that exists for the
    /// whole traversal is seen exactly once.
    fn snapshot(&self) -> Vec<Transaction> {
        let mut snapshot: Vec<Transaction> = self.records.iter()
            .map(|entry| entry.value().clone())
            .collect();

        snapshot.sort_by(listing_order);
        snapshot
    }
}

impl Default for TransactionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for TransactionStorage {
    fn save(&self, transaction: Transaction) -> Transaction {
        self.records.insert(transaction.id, transaction.clone());
        transaction
    }

    fn find_by_id(&self, transaction_id: TransactionId) -> Option<Transaction> {
        self.records.get(&transaction_id).map(|entry| entry.value().clone())
    }

    fn find_all(&self, page: PageRequest) -> Vec<Transaction> {
        self.snapshot()
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect()
    }

    fn delete_by_id(&self, transaction_id: TransactionId) {
        self.records.remove(&transaction_id);
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Most recent first; identifier breaks timestamp ties so pages are deterministic.
fn listing_order(left: &Transaction, right: &Transaction) -> Ordering {
    right.timestamp.cmp(&left.timestamp)
        .then_with(|| left.id.cmp(&right.id))
}

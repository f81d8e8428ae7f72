use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::TransactionId;

/// Fixed set of mutexes shared out by hashing the transaction id.
///
/// Two writers for the same id always meet on the same stripe; writers for
/// different ids only contend when their ids happen to collide.
pub struct StripedLock {
    stripes: Vec<Mutex<()>>
}

impl StripedLock {
    pub fn new(stripe_count: usize) -> Self {
        Self {
            stripes: (0..stripe_count.max(1)).map(|_| Mutex::new(())).collect()
        }
    }

    pub fn lock(&self, transaction_id: &TransactionId) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a panic in another holder leaves nothing inconsistent.
        self.stripes[self.index(transaction_id)]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    fn index(&self, transaction_id: &TransactionId) -> usize {
        let mut hasher = DefaultHasher::new();
        transaction_id.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }
}

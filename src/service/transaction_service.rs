use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::sync::Cache;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::models::{Transaction, TransactionError, TransactionRequest};
use crate::service::locks::StripedLock;
use crate::service::validation::{validate_pagination, validate_transaction};
use crate::storage::{Storage, TransactionStorage};
use crate::types::{PageRequest, TransactionId};

const DEFAULT_CACHE_CAPACITY: u64 = 10_000;
const DEFAULT_LOCK_STRIPES: usize = 64;

/// Validating, caching front for a [`Storage`].
///
/// Every write runs validate-then-commit: validation touches nothing, and the
/// commit (existence check, store mutation, cache invalidation) happens while
/// holding the lock stripe of the target id. Writes to different ids proceed in
/// parallel.
///
/// Reads are served from a read-through cache. A cache hit never blocks. A miss
/// reads the store under the same stripe lock as the writers, so a value read
/// before a concurrent write cannot be cached after that write has invalidated
/// it. Once a write returns, every later `get` observes it.
pub struct TransactionService<S: Storage = TransactionStorage> {
    storage: Arc<S>,
    cache: Option<Cache<TransactionId, Transaction>>,
    cache_capacity: u64,
    cache_timeout: Option<Duration>,
    locks: StripedLock
}

impl<S: Storage> TransactionService<S> {
    /// Creates a service with a bounded cache and the default lock striping.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            cache: Some(build_cache(DEFAULT_CACHE_CAPACITY, None)),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_timeout: None,
            locks: StripedLock::new(DEFAULT_LOCK_STRIPES)
        }
    }

    /// Sets the maximum number of cached records. Has no effect once the cache is disabled.
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self.rebuild_cache();
        self
    }

    /// Sets how long a cached record may be served before it is read again.
    /// Has no effect once the cache is disabled.
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = Some(timeout);
        self.rebuild_cache();
        self
    }

    /// Disables the cache for good; every `get` reads the store directly.
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Sets the number of write lock stripes (at least one).
    pub fn with_lock_stripes(mut self, stripes: usize) -> Self {
        self.locks = StripedLock::new(stripes);
        self
    }

    pub fn lock_stripes(&self) -> usize {
        self.locks.stripe_count()
    }

    /// Validates and stores a new record.
    ///
    /// A client-supplied id or timestamp is kept; otherwise a fresh v4 id and
    /// the current time are assigned; the nil id counts as absent. Saving under
    /// an id that already exists replaces that record.
    pub fn create(&self, request: TransactionRequest) -> Result<Transaction, TransactionError> {
        validate_transaction(&request)?;

        let transaction_id = request.id
            .filter(|id| !id.is_nil())
            .unwrap_or_else(Uuid::new_v4);
        let transaction = request.into_transaction(transaction_id, Utc::now())?;

        let _guard = self.locks.lock(&transaction_id);
        let saved = self.storage.save(transaction);
        self.invalidate(transaction_id);

        debug!("Transaction [{}]:[{}] created", saved.id, saved.transaction_type);

        Ok(saved)
    }

    /// Looks up a record, serving from the cache when possible.
    pub fn get(&self, transaction_id: TransactionId) -> Option<Transaction> {
        let Some(cache) = &self.cache else {
            return self.storage.find_by_id(transaction_id);
        };

        if let Some(transaction) = cache.get(&transaction_id) {
            trace!("Transaction [{transaction_id}] served from cache");
            return Some(transaction);
        }

        let _guard = self.locks.lock(&transaction_id);
        let transaction = self.storage.find_by_id(transaction_id)?;
        cache.insert(transaction_id, transaction.clone());

        Some(transaction)
    }

    /// Returns one page of records, most recent first.
    ///
    /// # Errors
    /// `InvalidPagination` if `page` is negative or `size` is outside `1..=MAX_PAGE_SIZE`.
    pub fn list(&self, page: i64, size: i64) -> Result<Vec<Transaction>, TransactionError> {
        let page = PageRequest::new(page, size);
        validate_pagination(&page)?;

        Ok(self.storage.find_all(page))
    }

    /// Fully replaces an existing record.
    ///
    /// The path id always wins over any id carried in `request`.
    ///
    /// # Errors
    /// Any validation error, or `NotFound` when no record exists under `transaction_id`.
    pub fn update(&self, transaction_id: TransactionId, request: TransactionRequest) -> Result<Transaction, TransactionError> {
        validate_transaction(&request)?;

        let _guard = self.locks.lock(&transaction_id);
        self.ensure_exists(transaction_id)?;

        let transaction = request.into_transaction(transaction_id, Utc::now())?;
        let saved = self.storage.save(transaction);
        self.invalidate(transaction_id);

        debug!("Transaction [{}]:[{}] updated", saved.id, saved.transaction_type);

        Ok(saved)
    }

    /// Removes an existing record.
    ///
    /// # Errors
    /// `NotFound` when no record exists under `transaction_id`.
    pub fn delete(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        let _guard = self.locks.lock(&transaction_id);
        self.ensure_exists(transaction_id)?;

        self.storage.delete_by_id(transaction_id);
        self.invalidate(transaction_id);

        debug!("Transaction [{transaction_id}] deleted");

        Ok(())
    }

    fn ensure_exists(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        match self.storage.find_by_id(transaction_id) {
            Some(_) => Ok(()),
            None => Err(TransactionError::not_found(transaction_id))
        }
    }

    /// Number of cached records after pending evictions have run.
    #[cfg(test)]
    pub fn cached_entries(&self) -> u64 {
        self.cache.as_ref().map_or(0, |cache| {
            cache.run_pending_tasks();
            cache.entry_count()
        })
    }

    fn rebuild_cache(&mut self) {
        if self.cache.is_some() {
            self.cache = Some(build_cache(self.cache_capacity, self.cache_timeout));
        }
    }

    fn invalidate(&self, transaction_id: TransactionId) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&transaction_id);
        }
    }
}

fn build_cache(capacity: u64, timeout: Option<Duration>) -> Cache<TransactionId, Transaction> {
    let builder = Cache::builder().max_capacity(capacity);

    match timeout {
        Some(timeout) => builder.time_to_live(timeout).build(),
        None => builder.build()
    }
}

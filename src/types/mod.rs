mod pagination;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use pagination::PageRequest;

pub type TransactionId = Uuid;
pub type Timestamp = DateTime<Utc>;

/// Largest page a caller may request from a listing.
pub const MAX_PAGE_SIZE: i64 = 50;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

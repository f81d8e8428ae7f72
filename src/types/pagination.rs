use crate::types::DEFAULT_PAGE_SIZE;

/// A window over an ordered listing.
///
/// `page` and `size` are signed so that out-of-range requests coming from the
/// outside can be represented and refused by the service rather than clamped
/// on the way in.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    /// Number of leading entries to discard, saturating instead of wrapping.
    pub fn offset(&self) -> usize {
        let page = usize::try_from(self.page).unwrap_or(0);
        page.saturating_mul(self.limit())
    }

    pub fn limit(&self) -> usize {
        usize::try_from(self.size).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self { page: self.page.saturating_add(1), size: self.size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: DEFAULT_PAGE_SIZE }
    }
}

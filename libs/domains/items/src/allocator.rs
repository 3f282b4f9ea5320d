use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{ItemError, ItemResult};

/// Source of candidate identifiers.
pub type IdGenerator = Arc<dyn Fn() -> Uuid + Send + Sync>;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Hands out item ids that have never been issued before.
///
/// Every id ever returned is remembered, including ids of deleted items, so a
/// deleted id is never reused. The remembered set only grows: one `Uuid`
/// (16 bytes plus hash-set overhead) per create for the life of the catalog,
/// and deletes do not shrink it. Not synchronized; callers hold it behind the
/// catalog lock.
pub struct IdAllocator {
    issued: HashSet<Uuid>,
    generator: IdGenerator,
    max_attempts: u32,
}

impl IdAllocator {
    /// Random v4 ids.
    pub fn new(max_attempts: u32) -> Self {
        Self::with_generator(max_attempts, Arc::new(Uuid::new_v4))
    }

    pub fn with_generator(max_attempts: u32, generator: IdGenerator) -> Self {
        Self {
            issued: HashSet::new(),
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn allocate(&mut self) -> ItemResult<Uuid> {
        for attempt in 1..=self.max_attempts {
            let candidate = (self.generator)();
            if self.issued.insert(candidate) {
                return Ok(candidate);
            }
            tracing::warn!(%candidate, attempt, "Generated item id was already issued");
        }

        tracing::error!(
            attempts = self.max_attempts,
            "Could not generate a fresh item id"
        );
        Err(ItemError::Internal(format!(
            "no unused id after {} attempts",
            self.max_attempts
        )))
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdAllocator")
            .field("issued", &self.issued.len())
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

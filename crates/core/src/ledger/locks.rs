//! Per-user write serialization.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use coinkeeper_shared::types::UserId;

/// One async mutex per user. Holding the guard grants exclusive write
/// access to that user's collections.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `user_id`'s ledger.
    pub async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(self.locks.entry(user_id).or_default().value());
        lock.lock_owned().await
    }
}

//! Per-account serialization of nonce resolution, signing and broadcast.

use std::sync::Arc;

use alloy::primitives::Address;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Process-wide map of account address to submission lock.
///
/// Cloning shares the map. Two submissions from the same account never
/// interleave between nonce lookup and broadcast, so the second one sees
/// the first in the pending count.
#[derive(Debug, Clone, Default)]
pub struct AccountLocks {
    locks: Arc<DashMap<Address, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    /// Create an empty lock map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for `address`, created on first use.
    #[must_use]
    pub fn lock_for(&self, address: Address) -> Arc<Mutex<()>> {
        let entry = self
            .locks
            .entry(address)
            .or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(entry.value())
    }

    /// Wait for exclusive access to `address`.
    pub async fn acquire(&self, address: Address) -> OwnedMutexGuard<()> {
        debug!(%address, "acquiring account lock");
        let guard = self.lock_for(address).lock_owned().await;
        debug!(%address, "account lock acquired");
        guard
    }
}

//! One in-flight submission per sender

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use dango_core::Addr;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Async locks keyed by sender address.
///
/// A submission holds its sender's lock from the sequence query until the
/// broadcast returns, so a second submission from the same sender reads the
/// sequence only after the first one landed. Different senders never wait on
/// each other.
#[derive(Debug, Default)]
pub(crate) struct SenderLocks {
    locks: Mutex<HashMap<Addr, Arc<AsyncMutex<()>>>>,
}

impl SenderLocks {
    pub(crate) async fn acquire(&self, sender: Addr) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Locks nobody holds or waits on can go.
            locks.retain(|addr, lock| *addr == sender || Arc::strong_count(lock) > 1);
            locks.entry(sender).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    const ALICE: Addr = Addr::from_inner([1; 20]);
    const BOB: Addr = Addr::from_inner([2; 20]);

    #[tokio::test]
    async fn test_same_sender_waits() {
        let locks = SenderLocks::default();
        let guard = locks.acquire(ALICE).await;

        assert!(timeout(Duration::from_millis(20), locks.acquire(ALICE)).await.is_err());

        drop(guard);
        assert!(timeout(Duration::from_millis(20), locks.acquire(ALICE)).await.is_ok());
    }

    #[tokio::test]
    async fn test_other_senders_proceed() {
        let locks = SenderLocks::default();
        let _alice = locks.acquire(ALICE).await;
        assert!(timeout(Duration::from_millis(20), locks.acquire(BOB)).await.is_ok());
    }

    #[tokio::test]
    async fn test_released_locks_are_pruned() {
        let locks = SenderLocks::default();
        drop(locks.acquire(ALICE).await);
        let _bob = locks.acquire(BOB).await;
        assert_eq!(locks.len(), 1);
    }
}

//! Admission control for in-flight samples

use std::sync::Arc;
use tally_core::{TallyError, TallyResult};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds how many samples of one run may be inside a request at once
///
/// Each `execute` builds its own gate, so runs never share capacity.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// RAII slot; dropping it releases the slot
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Create a gate; a capacity of zero is treated as one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held
    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }

    /// Wait for a free slot
    pub async fn acquire(&self) -> TallyResult<GatePermit> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| TallyError::invalid_state("concurrency gate closed"))?;
        Ok(GatePermit { _permit: permit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_clamped() {
        assert_eq!(ConcurrencyGate::new(0).capacity(), 1);
    }

    #[tokio::test]
    async fn test_permits_release_on_drop() {
        let gate = ConcurrencyGate::new(2);
        let first = gate.acquire().await.unwrap();
        let _second = gate.acquire().await.unwrap();
        assert_eq!(gate.in_flight(), 2);

        // Third caller waits until a slot frees up.
        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.acquire().await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(first);
        waiter.await.unwrap().unwrap();
        assert_eq!(gate.in_flight(), 1);
    }
}

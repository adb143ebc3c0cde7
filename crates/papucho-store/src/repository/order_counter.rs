//! # Order Counter
//!
//! The next order number lives in `orden_actual.txt` as plain decimal text.
//!
//! ```text
//! current()  ── file "42"         ──► 42
//!            ── missing / "abc"   ──► 1   (file rewritten with "1")
//! claim()    ── file "42"         ──► 42  (file rewritten with "43")
//! ```
//!
//! `current()` only peeks at the number the next confirmed order gets.
//! A confirmation takes its number with `claim()`, so two confirmations
//! in flight never share one.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::files;

const FIRST_ORDER: u32 = 1;

/// Persistent, monotonically advancing order number.
#[derive(Debug, Clone)]
pub struct OrderCounter {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl OrderCounter {
    pub(crate) fn new(path: PathBuf, lock: Arc<Mutex<()>>) -> Self {
        OrderCounter { path, lock }
    }

    /// Returns the number for the next order.
    pub async fn current(&self) -> StoreResult<u32> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Takes the current number for an order and persists the next one.
    ///
    /// Read and write happen under one lock guard.
    pub async fn claim(&self) -> StoreResult<u32> {
        let _guard = self.lock.lock().await;
        let number = self.read().await?;
        let next = number.saturating_add(1);
        self.write(next).await?;
        info!(order_number = number, next_order = next, "Order number claimed");
        Ok(number)
    }

    async fn read(&self) -> StoreResult<u32> {
        let text = files::read_text(&self.path).await?;
        match text.as_deref().map(str::trim).map(str::parse::<u32>) {
            Some(Ok(number)) if number >= FIRST_ORDER => Ok(number),
            Some(_) => {
                warn!(path = %self.path.display(), "Order counter unreadable, restarting at 1");
                self.write(FIRST_ORDER).await?;
                Ok(FIRST_ORDER)
            }
            None => {
                info!(path = %self.path.display(), "Order counter missing, starting at 1");
                self.write(FIRST_ORDER).await?;
                Ok(FIRST_ORDER)
            }
        }
    }

    async fn write(&self, number: u32) -> StoreResult<()> {
        files::write_text(&self.path, &number.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_counter(dir: &tempfile::TempDir) -> OrderCounter {
        OrderCounter::new(dir.path().join("orden_actual.txt"), Arc::new(Mutex::new(())))
    }

    #[tokio::test]
    async fn test_missing_file_starts_at_one() {
        let dir = tempfile::tempdir().unwrap();
        let counter = open_counter(&dir);

        assert_eq!(counter.current().await.unwrap(), 1);
        let text = std::fs::read_to_string(dir.path().join("orden_actual.txt")).unwrap();
        assert_eq!(text, "1");
    }

    #[tokio::test]
    async fn test_claim_persists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("orden_actual.txt"), "41\n").unwrap();
        let counter = open_counter(&dir);

        assert_eq!(counter.current().await.unwrap(), 41);
        assert_eq!(counter.claim().await.unwrap(), 41);
        assert_eq!(counter.current().await.unwrap(), 42);

        // a fresh handle sees the persisted value
        assert_eq!(open_counter(&dir).current().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_garbage_resets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("orden_actual.txt"), "cuarenta").unwrap();
        let counter = open_counter(&dir);

        assert_eq!(counter.current().await.unwrap(), 1);
        assert_eq!(counter.claim().await.unwrap(), 1);
        assert_eq!(counter.current().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_claim_hands_out_each_number_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("orden_actual.txt"), "7").unwrap();
        let counter = open_counter(&dir);

        assert_eq!(counter.claim().await.unwrap(), 7);
        assert_eq!(counter.claim().await.unwrap(), 8);
        assert_eq!(counter.current().await.unwrap(), 9);
        let text = std::fs::read_to_string(dir.path().join("orden_actual.txt")).unwrap();
        assert_eq!(text, "9");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let counter = open_counter(&dir);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                tokio::spawn(async move { counter.claim().await.unwrap() })
            })
            .collect();
        let mut numbers = Vec::new();
        for task in tasks {
            numbers.push(task.await.unwrap());
        }
        numbers.sort_unstable();

        assert_eq!(numbers, (1..=8).collect::<Vec<u32>>());
        assert_eq!(counter.current().await.unwrap(), 9);
    }
}

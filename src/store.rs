use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ProductFields, Record};

/// Key-value persistence for product records, addressed by primary key
///
/// Implementations are shared across requests behind an `Arc`, so they must be
/// `Send + Sync`. Errors are surfaced as-is; retry policy belongs to the
/// underlying client.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or fully replace the record at `id`
    async fn put(&self, id: &str, fields: &ProductFields) -> Result<()>;

    /// Point lookup, `Ok(None)` when no record exists
    async fn get(&self, id: &str) -> Result<Option<Record>>;

    /// Remove the record at `id`; deleting a missing key is not an error
    async fn delete(&self, id: &str) -> Result<()>;

    /// Read up to `limit` records in whatever order the store returns them
    async fn scan_limited(&self, limit: usize) -> Result<Vec<Record>>;

    /// Verify the store is reachable
    async fn health_check(&self) -> Result<()>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A store whose every call fails, counting the calls it receives
    #[derive(Default)]
    pub struct FailingStore {
        pub calls: AtomicUsize,
    }

    impl FailingStore {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn fail<T>(&self, op: &str) -> Result<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("store unavailable during {}", op))
        }
    }

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn put(&self, _id: &str, _fields: &ProductFields) -> Result<()> {
            self.fail("put")
        }

        async fn get(&self, _id: &str) -> Result<Option<Record>> {
            self.fail("get")
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            self.fail("delete")
        }

        async fn scan_limited(&self, _limit: usize) -> Result<Vec<Record>> {
            self.fail("scan")
        }

        async fn health_check(&self) -> Result<()> {
            self.fail("health check")
        }
    }
}

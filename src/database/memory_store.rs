use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{RecordStore, Snapshot};
use crate::errors::StoreResult;

/// Volatile store, used for `:memory:` and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read_all(&self) -> StoreResult<Snapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn write_all(&self, snapshot: &Snapshot) -> StoreResult<()> {
        *self.snapshot.write().await = snapshot.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_the_whole_snapshot() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let mut snapshot = store.read_all().await.unwrap();
            snapshot.sequences.sales = 9;
            store.write_all(&snapshot).await.unwrap();
            assert_eq!(store.read_all().await.unwrap().sequences.sales, 9);
        });
    }
}
